//! Request predicates deciding whether a request may use the cache.
//!
//! A predicate is any [`RequestPredicate`]: plain closures work, and the
//! provided building blocks compose with [`PredicateExt`]:
//!
//! ```
//! use tripcache_http::predicates::{Method, NoRange, PredicateExt, RequestPredicate};
//!
//! let predicate = Method::new(http::Method::GET).and(NoRange);
//! let request = http::Request::get("http://example.com/")
//!     .body(tripcache_core::Body::empty())
//!     .unwrap();
//! assert!(predicate.is_cacheable(&request));
//! ```

use http::header::RANGE;
use tripcache_core::Request;

/// Decides whether a request is eligible for caching.
pub trait RequestPredicate: Send + Sync {
    /// Returns `true` when `request` may be served from and stored in the cache.
    fn is_cacheable(&self, request: &Request) -> bool;
}

impl<F> RequestPredicate for F
where
    F: Fn(&Request) -> bool + Send + Sync,
{
    fn is_cacheable(&self, request: &Request) -> bool {
        self(request)
    }
}

/// Matches requests by HTTP method.
#[derive(Debug, Clone)]
pub struct Method {
    methods: Vec<http::Method>,
}

impl Method {
    /// Matches a single method.
    pub fn new(method: http::Method) -> Self {
        Self {
            methods: vec![method],
        }
    }

    /// Matches any of `methods`.
    pub fn any_of(methods: impl IntoIterator<Item = http::Method>) -> Self {
        Self {
            methods: methods.into_iter().collect(),
        }
    }
}

impl RequestPredicate for Method {
    fn is_cacheable(&self, request: &Request) -> bool {
        self.methods.contains(request.method())
    }
}

/// Rejects partial-content requests carrying a `Range` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRange;

impl RequestPredicate for NoRange {
    fn is_cacheable(&self, request: &Request) -> bool {
        !request.headers().contains_key(RANGE)
    }
}

/// `GET` and `HEAD` requests without a `Range` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPredicate;

impl RequestPredicate for DefaultPredicate {
    fn is_cacheable(&self, request: &Request) -> bool {
        let method = request.method();
        (method == http::Method::GET || method == http::Method::HEAD)
            && NoRange.is_cacheable(request)
    }
}

/// Both predicates must hold. The right side is skipped when the left fails.
#[derive(Debug, Clone)]
pub struct And<L, R> {
    left: L,
    right: R,
}

impl<L: RequestPredicate, R: RequestPredicate> RequestPredicate for And<L, R> {
    fn is_cacheable(&self, request: &Request) -> bool {
        self.left.is_cacheable(request) && self.right.is_cacheable(request)
    }
}

/// Either predicate must hold. The right side is skipped when the left holds.
#[derive(Debug, Clone)]
pub struct Or<L, R> {
    left: L,
    right: R,
}

impl<L: RequestPredicate, R: RequestPredicate> RequestPredicate for Or<L, R> {
    fn is_cacheable(&self, request: &Request) -> bool {
        self.left.is_cacheable(request) || self.right.is_cacheable(request)
    }
}

/// Inverts a predicate.
#[derive(Debug, Clone)]
pub struct Not<P> {
    predicate: P,
}

impl<P: RequestPredicate> RequestPredicate for Not<P> {
    fn is_cacheable(&self, request: &Request) -> bool {
        !self.predicate.is_cacheable(request)
    }
}

/// Fluent composition for [`RequestPredicate`]s.
pub trait PredicateExt: RequestPredicate + Sized {
    /// Requires `self` and `other`.
    fn and<R: RequestPredicate>(self, other: R) -> And<Self, R> {
        And {
            left: self,
            right: other,
        }
    }

    /// Requires `self` or `other`.
    fn or<R: RequestPredicate>(self, other: R) -> Or<Self, R> {
        Or {
            left: self,
            right: other,
        }
    }

    /// Inverts `self`.
    fn not(self) -> Not<Self> {
        Not { predicate: self }
    }
}

impl<P: RequestPredicate> PredicateExt for P {}
