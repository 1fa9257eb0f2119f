use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request, Response},
};
use tower::util::ServiceExt;

/// Headers that keep browsers from caching a response. Shared by the index
/// route and the static bundle, so a rebuilt page never runs a stale bundle.
pub(crate) fn disable_caching(headers: &mut HeaderMap) {
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store"),
    );
    headers.insert(header::EXPIRES, HeaderValue::from_static("-1"));
}

/// Applies [`disable_caching`] to every response of the wrapped service.
pub(crate) trait NoCacheServiceExt<T>
where
    T: tower::Service<Request<Body>>,
{
    fn no_cache(self) -> tower::util::MapResponse<T, fn(T::Response) -> T::Response>;
}

impl<T, ResponseBody> NoCacheServiceExt<T> for T
where
    T: tower::Service<Request<Body>, Response = Response<ResponseBody>>,
    ResponseBody: http_body::Body,
{
    fn no_cache(self) -> tower::util::MapResponse<T, fn(T::Response) -> T::Response> {
        ServiceExt::<Request<Body>>::map_response(self, |mut response| {
            disable_caching(response.headers_mut());
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn can_replace_existing_cache_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=3600"));
        disable_caching(&mut headers);

        assert_eq!("no-cache, no-store", headers[header::CACHE_CONTROL]);
        assert_eq!("-1", headers[header::EXPIRES]);
        assert_eq!(1, headers.get_all(header::CACHE_CONTROL).iter().count());
    }
}
