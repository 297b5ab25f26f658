use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::errors::{Error, Result};
use crate::renderer::for_loop::ForLoop;
use crate::renderer::stack_frame::{split_root, StackFrame, Val};
use crate::template::Template;
use crate::variables::{dotted_pointer, Variables};

/// Contains the user data and allows no mutation
#[derive(Debug)]
pub struct UserContext<'a> {
    /// Read-only context
    inner: &'a Variables,
}

impl<'a> UserContext<'a> {
    /// Create an immutable user context to be used in the call stack
    pub fn new(context: &'a Variables) -> Self {
        UserContext { inner: context }
    }

    pub fn find_value(&self, key: &str) -> Option<&'a Value> {
        self.inner.get(key)
    }

    pub fn find_value_by_dotted_pointer(&self, pointer: &str) -> Option<&'a Value> {
        let (root, rest) = split_root(pointer);
        self.inner.get(root).and_then(|val| dotted_pointer(val, rest))
    }
}

/// Contains the stack of frames
#[derive(Debug)]
pub struct CallStack<'a> {
    /// The stack of frames
    stack: Vec<StackFrame<'a>>,
    /// User supplied context for the render
    context: UserContext<'a>,
    /// Template being rendered
    template: &'a Template,
}

impl<'a> CallStack<'a> {
    /// Create the initial call stack
    pub fn new(context: &'a Variables, template: &'a Template) -> CallStack<'a> {
        CallStack {
            stack: vec![StackFrame::new()],
            context: UserContext::new(context),
            template,
        }
    }

    pub fn push_for_loop_frame(&mut self, for_loop: ForLoop<'a>) {
        self.stack.push(StackFrame::with_for_loop(for_loop));
    }

    /// Returns mutable reference to current `StackFrame`
    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame<'a>> {
        self.stack.last_mut()
    }

    /// Pop the last frame, the origin one stays
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Whether undefined variables are an error
    pub fn is_strict(&self) -> bool {
        self.context.inner.is_strict()
    }

    /// Grab the template being rendered
    pub fn active_template(&self) -> &'a Template {
        self.template
    }

    pub fn lookup(&self, key: &str) -> Option<Val<'a>> {
        for stack_frame in self.stack.iter().rev() {
            let found = stack_frame.find_value(key);
            if found.is_some() {
                return found;
            }
        }

        // Not in stack frame, look in user supplied context
        if key.contains('.') {
            return self.context.find_value_by_dotted_pointer(key).map(Cow::Borrowed);
        }
        self.context.find_value(key).map(Cow::Borrowed)
    }

    /// Add an assignment value (via `{% set ... %}`) to the current frame
    pub fn add_assignment(&mut self, key: &'a str, value: Val<'a>) {
        if let Some(frame) = self.current_frame_mut() {
            frame.insert(key, value);
        }
    }

    /// Moves the current for loop to its next iteration
    pub fn increment_for_loop(&mut self) -> Result<()> {
        let frame = self
            .current_frame_mut()
            .ok_or_else(|| Error::msg("Attempted `increment` with an empty call stack"))?;
        frame.clear_context();
        match frame.for_loop {
            Some(ref mut for_loop) => {
                for_loop.increment();
                Ok(())
            }
            None => Err(Error::msg("Attempted `increment` while not in `for loop`")),
        }
    }

    /// Everything the template can currently see, as one object
    pub fn current_context_cloned(&self) -> Value {
        let mut context = match self.context.inner.clone().into_json() {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        // Inner frames shadow outer ones and the user context
        for frame in &self.stack {
            context.extend(frame.context_owned());
        }

        Value::Object(context)
    }
}
