use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::renderer::for_loop::ForLoop;
use crate::variables::dotted_pointer;

pub type Val<'a> = Cow<'a, Value>;
pub type FrameContext<'a> = HashMap<&'a str, Val<'a>>;

/// Gets a value within a value by pointer, keeping lifetime
#[inline]
pub fn value_by_pointer<'a>(pointer: &str, val: &Val<'a>) -> Option<Val<'a>> {
    match *val {
        Cow::Borrowed(r) => dotted_pointer(r, pointer).map(Cow::Borrowed),
        Cow::Owned(ref r) => dotted_pointer(r, pointer).map(|found| Cow::Owned(found.clone())),
    }
}

/// Splits `a.b.c` into `("a", "b.c")`
#[inline]
pub fn split_root(key: &str) -> (&str, &str) {
    match key.find('.') {
        Some(pos) => (&key[..pos], &key[pos + 1..]),
        None => (key, ""),
    }
}

/// Entry in the call stack: the origin frame of a render, or one per for loop being run
#[derive(Debug, Default)]
pub struct StackFrame<'a> {
    /// Values assigned with `{% set %}` while this frame is the current one
    context: FrameContext<'a>,
    /// Set for the frame of a for loop
    pub for_loop: Option<ForLoop<'a>>,
}

impl<'a> StackFrame<'a> {
    pub fn new() -> Self {
        StackFrame::default()
    }

    pub fn with_for_loop(for_loop: ForLoop<'a>) -> Self {
        StackFrame { context: FrameContext::new(), for_loop: Some(for_loop) }
    }

    /// Finds a value in the stack frame.
    /// Looks first in `frame_context`, then compares to for_loop key_name and value_name.
    pub fn find_value(&self, key: &str) -> Option<Val<'a>> {
        self.find_value_in_frame(key).or_else(|| self.find_value_in_for_loop(key))
    }

    /// Finds a value in `frame_context`.
    pub fn find_value_in_frame(&self, key: &str) -> Option<Val<'a>> {
        let (root, tail) = split_root(key);
        let found = self.context.get(root)?;
        if tail.is_empty() {
            Some(found.clone())
        } else {
            value_by_pointer(tail, found)
        }
    }

    /// Finds a value in the `for_loop` if there is one
    pub fn find_value_in_for_loop(&self, key: &str) -> Option<Val<'a>> {
        let for_loop = self.for_loop.as_ref()?;

        // 1st case: the variable is the key of a KeyValue for loop
        if for_loop.is_key(key) {
            return for_loop.get_current_key().map(|k| Cow::Owned(Value::String(k.to_string())));
        }

        let (root, tail) = split_root(key);

        // 2nd case: one of the loop built-in variables
        if root == "loop" {
            return match tail {
                "index" => Some(Cow::Owned(Value::Number((for_loop.current + 1).into()))),
                "index0" => Some(Cow::Owned(Value::Number(for_loop.current.into()))),
                "first" => Some(Cow::Owned(Value::Bool(for_loop.current == 0))),
                "last" => Some(Cow::Owned(Value::Bool(for_loop.is_last()))),
                _ => None,
            };
        }

        // Last case: the variable is/starts with the value name of the for loop
        if root == for_loop.value_name {
            let current = for_loop.get_current_value();
            if tail.is_empty() {
                return Some(current);
            }
            return value_by_pointer(tail, &current);
        }

        None
    }

    /// Insert a value in the context
    pub fn insert(&mut self, key: &'a str, value: Val<'a>) {
        self.context.insert(key, value);
    }

    /// Context is cleared on each loop
    pub fn clear_context(&mut self) {
        if self.for_loop.is_some() {
            self.context.clear();
        }
    }

    /// Everything visible from this frame alone, owned
    pub fn context_owned(&self) -> HashMap<String, Value> {
        let mut context = HashMap::new();

        if let Some(ref for_loop) = self.for_loop {
            context.insert(
                for_loop.value_name.to_string(),
                for_loop.get_current_value().into_owned(),
            );
            if let (Some(name), Some(key)) = (for_loop.key_name, for_loop.get_current_key()) {
                context.insert(name.to_string(), Value::String(key.to_string()));
            }
        }

        for (key, val) in &self.context {
            context.insert((*key).to_string(), val.clone().into_owned());
        }

        context
    }
}
