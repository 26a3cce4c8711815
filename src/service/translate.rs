use std::future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use hyper::Request;
use hyper::Response;
use tower::Layer;
use tower::Service;
use tracing::warn;

use crate::environment::Environment;
use crate::request::ConnectionInfo;
use crate::request::RawRequest;
use crate::request::ServerIdentity;
use crate::translator::Translator;
use crate::util::response_ext::ResponseExt;

/// Wraps a handler taking [`Environment`]s into a service taking HTTP requests.
///
/// The connection layer may attach an `Arc<ServerIdentity>` and an `Arc<ConnectionInfo>` to
/// each request as extensions. Without them, the layer's identity and the request's HTTP
/// version are used.
#[derive(Clone, Debug, Default)]
pub struct TranslateLayer {
  translator: Translator,
  server: Arc<ServerIdentity>,
}

impl TranslateLayer {
  pub fn new(translator: Translator, server: ServerIdentity) -> Self {
    Self { translator, server: Arc::new(server) }
  }
}

impl<S> Layer<S> for TranslateLayer {
  type Service = TranslateService<S>;

  fn layer(&self, inner: S) -> Self::Service {
    TranslateService { inner, translator: self.translator, server: self.server.clone() }
  }
}

#[derive(Clone, Debug)]
pub struct TranslateService<S> {
  inner: S,
  translator: Translator,
  server: Arc<ServerIdentity>,
}

impl<S, B, ResBody> Service<Request<B>> for TranslateService<S>
where
  S: Service<Environment<B>, Response = Response<ResBody>>,
  S::Future: Send + 'static,
  S::Error: Send + 'static,
  ResBody: Default + Send + 'static,
{
  type Response = Response<ResBody>;
  type Error = S::Error;
  type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

  fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
    self.inner.poll_ready(cx)
  }

  fn call(&mut self, request: Request<B>) -> Self::Future {
    let server =
      request.extensions().get::<Arc<ServerIdentity>>().unwrap_or(&self.server).clone();
    let connection = request
      .extensions()
      .get::<Arc<ConnectionInfo>>()
      .cloned()
      .unwrap_or_else(|| Arc::new(ConnectionInfo::from(request.version())));

    match self.translator.translate(RawRequest::from(request), &server, &connection) {
      Ok(environment) => Box::pin(self.inner.call(environment)),
      Err(err) => {
        warn!("Rejecting request: {err}");
        let status = err.status();
        Box::pin(future::ready(Ok(Response::with_status(status, ResBody::default()))))
      }
    }
  }
}
