use super::error_handling::FetchError;
use std::sync::Arc;

pub type FetchResult<R> = Result<R, FetchError>;

/// Completion callback handed to a capability. Being `FnOnce`, it can be
/// called at most once per `invoke`.
pub type OnComplete<R> = Box<dyn FnOnce(FetchResult<R>) + Send + 'static>;

/// The asynchronous fetch a view depends on.
///
/// Implementations may call `on_complete` before `invoke` returns (test fakes)
/// or at any later point (the runtime-backed adapter). They may also never call
/// it, in which case the view stays pending.
pub trait FetchCapability<O, R>: Send + Sync {
    fn invoke(&self, options: O, on_complete: OnComplete<R>);
}

/// Plain closures are capabilities.
impl<O, R, F> FetchCapability<O, R> for F
where
    F: Fn(O, OnComplete<R>) + Send + Sync,
{
    fn invoke(&self, options: O, on_complete: OnComplete<R>) {
        self(options, on_complete)
    }
}

/// Injectable capability slot. Views hold a clone; whoever builds the view
/// decides its lifetime.
pub type SharedCapability<O, R> = Arc<dyn FetchCapability<O, R>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_is_a_capability() {
        let capability = |limit: usize, done: OnComplete<Vec<usize>>| {
            done(Ok((0..limit).collect()));
        };

        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        capability.invoke(3, Box::new(move |result| *sink.lock().unwrap() = Some(result)));

        assert_eq!(*seen.lock().unwrap(), Some(Ok(vec![0, 1, 2])));
    }

    #[test]
    fn test_shared_capability_dispatches_through_arc() {
        let shared: SharedCapability<(), &'static str> =
            Arc::new(|_: (), done: OnComplete<&'static str>| done(Err(FetchError::Status { code: 500 })));

        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        shared.invoke((), Box::new(move |result| *sink.lock().unwrap() = Some(result)));

        assert_eq!(
            *seen.lock().unwrap(),
            Some(Err(FetchError::Status { code: 500 }))
        );
    }
}
