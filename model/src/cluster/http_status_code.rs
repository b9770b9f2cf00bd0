pub use http::StatusCode;
use kube::Error;

pub trait HttpStatusCode {
    fn status_code(&self) -> Option<StatusCode>;

    fn is_status_code(&self, status_code: StatusCode) -> bool {
        self.status_code()
            .map(|some| some == status_code)
            .unwrap_or_default()
    }
}

impl HttpStatusCode for kube::Error {
    fn status_code(&self) -> Option<StatusCode> {
        if let Error::Api(error_response) = self {
            StatusCode::from_u16(error_response.code).ok()
        } else {
            None
        }
    }
}

impl<T, E> HttpStatusCode for std::result::Result<T, E>
where
    E: HttpStatusCode,
{
    fn status_code(&self) -> Option<StatusCode> {
        self.as_ref().err().and_then(|e| e.status_code())
    }
}

/// Treats a `404 Not Found` as the absence of a value rather than as an error. Objects we wait on
/// are routinely absent until the cluster gets around to creating them.
pub trait AllowNotFound<T, E> {
    /// Converts `Ok(t)` to `Ok(Some(t))` and a not-found error to `Ok(None)`, handing the error to
    /// `f`. Every other error is returned unchanged.
    fn allow_not_found<F>(self, f: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(E);
}

impl<T, E> AllowNotFound<T, E> for std::result::Result<T, E>
where
    E: HttpStatusCode,
{
    fn allow_not_found<F>(self, f: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(E),
    {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_status_code(StatusCode::NOT_FOUND) => {
                f(e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
