use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use hyper::body::Body;
use hyper::body::Frame;
use hyper::body::SizeHint;

/// The request body bound under `rack.input`.
///
/// Either the untouched body of the request, or an already exhausted stream when the request
/// declared no body. Reading is left to whoever takes the input out of the environment.
#[derive(Debug)]
pub struct Input<B> {
  body: Option<B>,
}

impl<B> Input<B> {
  pub fn new(body: B) -> Self {
    Self { body: Some(body) }
  }

  pub fn empty() -> Self {
    Self { body: None }
  }

  pub fn is_bound(&self) -> bool {
    self.body.is_some()
  }

  pub fn into_inner(self) -> Option<B> {
    self.body
  }
}

impl<B> Default for Input<B> {
  fn default() -> Self {
    Self::empty()
  }
}

impl<B> Body for Input<B>
where
  B: Body + Unpin,
{
  type Data = B::Data;
  type Error = B::Error;

  fn poll_frame(
    mut self: Pin<&mut Self>,
    cx: &mut Context<'_>,
  ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
    match self.body.as_mut() {
      Some(body) => Pin::new(body).poll_frame(cx),
      None => Poll::Ready(None),
    }
  }

  fn is_end_stream(&self) -> bool {
    self.body.as_ref().is_none_or(Body::is_end_stream)
  }

  fn size_hint(&self) -> SizeHint {
    match &self.body {
      Some(body) => body.size_hint(),
      None => SizeHint::with_exact(0),
    }
  }
}
