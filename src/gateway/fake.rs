//! Scripted gateway for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use futures_util::stream;

use super::{ChatRequest, FragmentStream, GatewayError, ModelGateway};
use crate::transcript::Message;

/// One scripted reply.
pub enum Reply {
    /// Succeeds with these fragments.
    Text(Vec<&'static str>),
    /// Yields these fragments, then fails.
    FailAfter(Vec<&'static str>),
    /// Fails before any fragment.
    Reject,
}

pub struct ScriptedGateway {
    replies: RefCell<VecDeque<Reply>>,
    models: Vec<String>,
    requests: RefCell<Vec<Vec<Message>>>,
    model_calls: Cell<usize>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            models: Vec::new(),
            requests: RefCell::new(Vec::new()),
            model_calls: Cell::new(0),
        }
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| (*m).to_string()).collect();
        self
    }

    /// Transcript snapshots received by `complete`/`stream`, in call order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.borrow().clone()
    }

    pub fn chat_calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn model_calls(&self) -> usize {
        self.model_calls.get()
    }

    fn next_reply(&self, request: &ChatRequest<'_>) -> Reply {
        self.requests.borrow_mut().push(request.messages.to_vec());
        self.replies.borrow_mut().pop_front().unwrap_or(Reply::Reject)
    }
}

fn failure() -> GatewayError {
    GatewayError::Stream("scripted failure".to_string())
}

impl ModelGateway for ScriptedGateway {
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError> {
        match self.next_reply(request) {
            Reply::Text(fragments) => Ok(fragments.concat()),
            Reply::FailAfter(_) | Reply::Reject => Err(failure()),
        }
    }

    async fn stream(&self, request: &ChatRequest<'_>) -> Result<FragmentStream, GatewayError> {
        match self.next_reply(request) {
            Reply::Text(fragments) => Ok(Box::pin(stream::iter(
                fragments.into_iter().map(|f| Ok(f.to_string())),
            ))),
            Reply::FailAfter(fragments) => {
                let items: Vec<Result<String, GatewayError>> = fragments
                    .into_iter()
                    .map(|f| Ok(f.to_string()))
                    .chain(std::iter::once(Err(failure())))
                    .collect();
                Ok(Box::pin(stream::iter(items)))
            }
            Reply::Reject => Err(failure()),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        self.model_calls.set(self.model_calls.get() + 1);
        Ok(self.models.clone())
    }
}
