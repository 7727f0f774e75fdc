use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use crate::BoxFuture;

/// One-shot future polled cooperatively from the UI thread, once per frame.
///
/// The value is handed out exactly once; afterwards the task stays
/// exhausted and [`AsyncTask::poll_once`] keeps returning `None`.
pub struct AsyncTask<T>(Option<BoxFuture<'static, T>>);

impl<T> AsyncTask<T> {
    pub fn new(future: BoxFuture<'static, T>) -> Self {
        Self(Some(future))
    }

    pub fn poll_once(&mut self) -> Option<T> {
        let future = self.0.as_mut()?;
        let waker = Waker::noop();
        let mut cx = Context::from_waker(waker);
        match Pin::new(future).poll(&mut cx) {
            Poll::Ready(value) => {
                self.0 = None;
                Some(value)
            }
            Poll::Pending => None,
        }
    }
}

/// Like [`AsyncTask`], but keeps the finished value around so callers can
/// keep inspecting it (e.g. showing the last job error in the UI).
pub enum AsyncRefTask<T> {
    Pending(BoxFuture<'static, T>),
    Ready(T),
}

impl<T> AsyncRefTask<T> {
    pub fn new(future: BoxFuture<'static, T>) -> Self {
        Self::Pending(future)
    }

    pub fn new_ready(value: T) -> Self {
        Self::Ready(value)
    }

    pub fn data(&mut self) -> Option<&mut T> {
        if let Self::Pending(future) = self {
            let waker = Waker::noop();
            let mut cx = Context::from_waker(waker);
            if let Poll::Ready(value) = Pin::new(future).poll(&mut cx) {
                *self = Self::Ready(value);
            }
        }
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn poll_once_hands_out_the_value_exactly_once() {
        let mut task = AsyncTask::new(async { 7 }.boxed());
        assert_eq!(task.poll_once(), Some(7));
        assert_eq!(task.poll_once(), None);
    }

    #[test]
    fn ref_task_keeps_the_value_available() {
        let mut task = AsyncRefTask::new(async { "done" }.boxed());
        assert_eq!(task.data(), Some(&mut "done"));
        assert_eq!(task.data(), Some(&mut "done"));
    }
}
