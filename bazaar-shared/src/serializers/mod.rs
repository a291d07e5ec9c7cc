/// JSON representations and payload validation
///
/// # Modules
///
/// - `errors`: Field-scoped error map (`{"field": ["message"]}`)
/// - `fields`: Loosely typed field decoding from a JSON object
/// - `account`: Account representation and the three account payloads
/// - `product`: Summary/detail product representations and validation
///
/// # Method dispatch
///
/// Some endpoints use a different serializer depending on the HTTP method.
/// [`SerializerMap`] is the lookup table for that choice:
///
/// ```
/// use axum::http::Method;
/// use bazaar_shared::serializers::SerializerMap;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Shape { Short, Long }
///
/// let map = SerializerMap::new(Shape::Long).route(Method::GET, Shape::Short);
/// assert_eq!(map.select(&Method::GET), Shape::Short);
/// assert_eq!(map.select(&Method::PUT), Shape::Long);
/// ```

use axum::http::Method;

pub mod account;
pub mod errors;
pub mod fields;
pub mod product;

pub use errors::FieldErrors;

/// HTTP method to serializer lookup with a fallback
#[derive(Debug, Clone)]
pub struct SerializerMap<S> {
    routes: Vec<(Method, S)>,
    fallback: S,
}

impl<S: Copy> SerializerMap<S> {
    pub fn new(fallback: S) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// Uses `serializer` for `method`, replacing any earlier entry
    pub fn route(mut self, method: Method, serializer: S) -> Self {
        self.routes.retain(|(m, _)| *m != method);
        self.routes.push((method, serializer));
        self
    }

    /// Serializer for `method`, or the fallback
    pub fn select(&self, method: &Method) -> S {
        self.routes
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, s)| *s)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_replaces_entry() {
        let map = SerializerMap::new(0u8)
            .route(Method::GET, 1)
            .route(Method::GET, 2);

        assert_eq!(map.select(&Method::GET), 2);
        assert_eq!(map.select(&Method::POST), 0);
    }
}
