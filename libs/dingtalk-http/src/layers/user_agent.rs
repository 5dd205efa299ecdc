use crate::error::HttpError;
use http::header::USER_AGENT;
use http::{HeaderValue, Request};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that stamps a User-Agent header on outgoing requests
///
/// A header already set by the caller wins.
#[derive(Clone, Debug)]
pub struct UserAgentLayer {
    value: HeaderValue,
}

impl UserAgentLayer {
    /// Build the layer from a user agent string
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if the string is not a valid header value
    pub fn try_new(user_agent: impl AsRef<str>) -> Result<Self, HttpError> {
        let value = HeaderValue::from_str(user_agent.as_ref())?;
        Ok(Self { value })
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            value: self.value.clone(),
        }
    }
}

/// Service produced by [`UserAgentLayer`]
#[derive(Clone, Debug)]
pub struct UserAgentService<S> {
    inner: S,
    value: HeaderValue,
}

impl<S, B> Service<Request<B>> for UserAgentService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        req.headers_mut()
            .entry(USER_AGENT)
            .or_insert_with(|| self.value.clone());
        self.inner.call(req)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Records the User-Agent of every request it sees.
    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<Option<HeaderValue>>>>,
    }

    impl Service<Request<()>> for Recorder {
        type Response = ();
        type Error = std::convert::Infallible;
        type Future = std::future::Ready<Result<(), Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<()>) -> Self::Future {
            self.seen
                .lock()
                .unwrap()
                .push(req.headers().get(USER_AGENT).cloned());
            std::future::ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_user_agent_injected_when_missing() {
        let recorder = Recorder::default();
        let service = UserAgentLayer::try_new("dingtalk-test/1.0")
            .unwrap()
            .layer(recorder.clone());

        let req = Request::get("https://oapi.dingtalk.com/").body(()).unwrap();
        service.oneshot(req).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[Some(HeaderValue::from_static("dingtalk-test/1.0"))]
        );
    }

    #[tokio::test]
    async fn test_caller_user_agent_kept() {
        let recorder = Recorder::default();
        let service = UserAgentLayer::try_new("dingtalk-test/1.0")
            .unwrap()
            .layer(recorder.clone());

        let req = Request::get("https://oapi.dingtalk.com/")
            .header(USER_AGENT, "caller/2.0")
            .body(())
            .unwrap();
        service.oneshot(req).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[Some(HeaderValue::from_static("caller/2.0"))]);
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let result = UserAgentLayer::try_new("bad\x00agent");
        assert!(matches!(result, Err(HttpError::InvalidHeaderValue(_))));
    }
}
