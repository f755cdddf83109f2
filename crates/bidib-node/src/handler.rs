use std::collections::VecDeque;

use bidib_wire::Message;

use crate::node::Node;

/// One slot in the per-message-type dispatch table.
///
/// `Static` answers with a fixed message. `Typed` decodes its own payload
/// and calls into the node. `Enumerating` is a one-shot override holding
/// the remaining replies of a running `_GETALL` walk; when it runs dry the
/// slot reverts to the static "no more entries" answer.
#[derive(Default)]
pub enum Handler {
    #[default]
    None,
    Static(Message),
    Typed(fn(&mut Node, &Message)),
    Enumerating(Enumeration),
}

/// Cursor state of a running enumeration.
pub struct Enumeration {
    pub replies: VecDeque<Message>,
    pub exhausted: Message,
}

impl Enumeration {
    pub fn new(replies: VecDeque<Message>, exhausted: Message) -> Self {
        Self { replies, exhausted }
    }
}

/// Build a `Handler::Typed` from a payload schema and a body.
///
/// Expands to a non-capturing closure that unpacks the schema left to
/// right and invokes the body; unpack failures are logged and produce no
/// reply, matching the engine's error policy.
macro_rules! typed_handler {
    (|$node:ident $(, $arg:ident : $ty:ty)*| $body:expr) => {
        $crate::handler::Handler::Typed(|$node, msg| {
            match bidib_wire::unpack::<($($ty,)*)>(msg.payload()) {
                Ok(($($arg,)*)) => $body,
                Err(err) => {
                    tracing::error!(error = %err, message = ?msg, "error unpacking args");
                }
            }
        })
    };
}

pub(crate) use typed_handler;
