use hyper::Response;
use hyper::StatusCode;

pub(crate) trait ResponseExt<T> {
  fn with_status(status: StatusCode, body: T) -> Response<T>;
}

impl<T> ResponseExt<T> for Response<T> {
  fn with_status(status: StatusCode, body: T) -> Self {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
  }
}
