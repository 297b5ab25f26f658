use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::errors::{Error, Result};
use crate::helpers;
use crate::parser::ast::*;
use crate::renderer::call_stack::CallStack;
use crate::renderer::for_loop::ForLoop;
use crate::renderer::stack_frame::Val;
use crate::template::Template;
use crate::utils::escape_html;
use crate::variables::{ValueRender, ValueTruthy, Variables};
use crate::view::View;

/// Name of the function giving access to the whole scope
const VARS_FUNCTION: &str = "vars";

/// Numbers compare by value whatever their representation, `1 == 1.0`
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(l), Value::Number(r)) => l.as_f64() == r.as_f64(),
        _ => lhs == rhs,
    }
}

/// Processes the ast and renders the output
pub struct Processor<'a> {
    /// The template we're trying to render
    template: &'a Template,
    /// The view holding filters, functions and the other templates
    view: &'a View,
    /// The call stack for processing
    call_stack: CallStack<'a>,
    /// If set, rendering should be escaped
    should_escape: bool,
}

impl<'a> Processor<'a> {
    /// Create a new `Processor` that will do the rendering
    pub fn new(
        template: &'a Template,
        view: &'a View,
        context: &'a Variables,
        should_escape: bool,
    ) -> Self {
        Processor { template, view, call_stack: CallStack::new(context, template), should_escape }
    }

    /// Entry point for the rendering
    pub fn render(&mut self) -> Result<String> {
        let template = self.template;
        let mut output = String::with_capacity(template.ast.len() * 20);
        self.render_body(&template.ast, &mut output)?;
        Ok(output)
    }

    fn render_body(&mut self, body: &'a [Node], output: &mut String) -> Result<()> {
        for n in body {
            self.render_node(n, output)?;
        }

        Ok(())
    }

    fn render_node(&mut self, node: &'a Node, output: &mut String) -> Result<()> {
        match *node {
            Node::Text(ref s) => output.push_str(s),
            Node::Comment(_) => (),
            Node::Output(ref expr) => self.render_output(expr, output)?,
            Node::Set(ref set) => self.eval_set(set)?,
            Node::Loop(ref for_loop) => self.render_for_loop(for_loop, output)?,
            Node::If(ref if_node) => self.render_if_node(if_node, output)?,
        };

        Ok(())
    }

    fn render_output(&mut self, expr: &'a Expr, output: &mut String) -> Result<()> {
        let rendered = self.eval_expression(expr)?.render();

        if self.should_escape && !self.is_safe_output(expr) {
            output.push_str(&escape_html(&rendered));
        } else {
            output.push_str(&rendered);
        }

        Ok(())
    }

    /// Output of `safe`, of safe filters and functions, and of view helpers is never escaped
    fn is_safe_output(&self, expr: &Expr) -> bool {
        match *expr {
            // `true` or `false`
            Expr::Not(_) | Expr::Compare { .. } | Expr::Logic { .. } => true,
            Expr::Filtered { ref filters, .. } => match filters.last() {
                Some(filter) if filter.name == "safe" => true,
                Some(filter) => {
                    self.view.get_filter(&filter.name).map(|f| f.is_safe()).unwrap_or(false)
                }
                None => false,
            },
            Expr::Call(ref call) => {
                helpers::is_view_helper(&call.name)
                    || self.view.get_function(&call.name).map(|f| f.is_safe()).unwrap_or(false)
            }
            _ => false,
        }
    }

    fn render_for_loop(&mut self, for_loop: &'a Loop, output: &mut String) -> Result<()> {
        let container_val = self.eval_expression(&for_loop.container)?;

        let for_loop_data = match *container_val {
            Value::Array(_) => {
                if for_loop.key.is_some() {
                    return Err(Error::msg(format!(
                        "Tried to iterate using key value on variable `{}`, but it isn't an object/map",
                        for_loop.container.source_name(),
                    )));
                }
                ForLoop::from_array(&for_loop.value, container_val)
            }
            Value::Object(_) => match for_loop.key {
                Some(ref key) => ForLoop::from_object(key, &for_loop.value, container_val),
                None => {
                    return Err(Error::msg(format!(
                        "Tried to iterate using key value on variable `{}`, but it is missing a key",
                        for_loop.container.source_name(),
                    )));
                }
            },
            // undefined containers don't loop
            Value::Null => return Ok(()),
            _ => {
                return Err(Error::msg(format!(
                    "Tried to iterate on a container (`{}`) that has a unsupported type",
                    for_loop.container.source_name(),
                )));
            }
        };

        let len = for_loop_data.len();
        self.call_stack.push_for_loop_frame(for_loop_data);

        for _ in 0..len {
            self.render_body(&for_loop.body, output)?;
            self.call_stack.increment_for_loop()?;
        }

        self.call_stack.pop();

        Ok(())
    }

    fn render_if_node(&mut self, if_node: &'a Conditional, output: &mut String) -> Result<()> {
        for (expr, body) in &if_node.branches {
            if self.eval_as_bool(expr)? {
                return self.render_body(body, output);
            }
        }

        if let Some(ref body) = if_node.otherwise {
            return self.render_body(body, output);
        }

        Ok(())
    }

    fn lookup_ident(&self, key: &str) -> Result<Val<'a>> {
        match self.call_stack.lookup(key) {
            Some(v) => Ok(v),
            None if self.call_stack.is_strict() => Err(Error::msg(format!(
                "Variable `{}` not found in context while rendering '{}'",
                key,
                self.call_stack.active_template().name
            ))),
            None => Ok(Cow::Owned(Value::Null)),
        }
    }

    fn eval_expression(&mut self, expr: &'a Expr) -> Result<Val<'a>> {
        let res = match *expr {
            Expr::Literal(ref value) => Cow::Borrowed(value),
            Expr::Array(ref items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expression(item)?.into_owned());
                }
                Cow::Owned(Value::Array(values))
            }
            Expr::Ident(ref ident) => self.lookup_ident(ident)?,
            Expr::Call(ref call) => self.eval_fn_call(call)?,
            Expr::Filtered { ref value, ref filters } => {
                // `undefined | default(..)` doesn't error in strict mode
                let lenient = filters.first().map(|f| f.name == "default").unwrap_or(false);
                let mut res = if lenient {
                    self.eval_lenient(value)?
                } else {
                    self.eval_expression(value)?
                };
                for filter in filters {
                    res = self.eval_filter(&res, filter)?;
                }
                res
            }
            // and neither does `not undefined`
            Expr::Not(ref negated) => {
                Cow::Owned(Value::Bool(!self.eval_lenient(negated)?.is_truthy()))
            }
            Expr::Compare { ref lhs, op, ref rhs } => {
                let lhs = self.eval_expression(lhs)?;
                let rhs = self.eval_expression(rhs)?;
                Cow::Owned(Value::Bool(values_equal(&lhs, &rhs) == (op == CompareOp::Eq)))
            }
            Expr::Logic { ref lhs, op, ref rhs } => {
                let res = match op {
                    LogicOp::Or => self.eval_as_bool(lhs)? || self.eval_as_bool(rhs)?,
                    LogicOp::And => self.eval_as_bool(lhs)? && self.eval_as_bool(rhs)?,
                };
                Cow::Owned(Value::Bool(res))
            }
        };

        Ok(res)
    }

    /// Same as `eval_expression` but an undefined variable, filtered or not, is `null` even in
    /// strict mode
    fn eval_lenient(&mut self, expr: &'a Expr) -> Result<Val<'a>> {
        match *expr {
            Expr::Ident(ref ident) => {
                Ok(self.call_stack.lookup(ident).unwrap_or(Cow::Owned(Value::Null)))
            }
            Expr::Filtered { ref value, ref filters } => {
                let mut res = self.eval_lenient(value)?;
                for filter in filters {
                    res = self.eval_filter(&res, filter)?;
                }
                Ok(res)
            }
            _ => self.eval_expression(expr),
        }
    }

    fn eval_as_bool(&mut self, expr: &'a Expr) -> Result<bool> {
        Ok(self.eval_expression(expr)?.is_truthy())
    }

    /// Evaluate a set tag and add the value to the current frame
    fn eval_set(&mut self, set: &'a Set) -> Result<()> {
        let assigned_value = self.eval_expression(&set.value)?;
        self.call_stack.add_assignment(&set.key[..], assigned_value);
        Ok(())
    }

    fn eval_args(&mut self, args: &'a HashMap<String, Expr>) -> Result<HashMap<String, Value>> {
        let mut evaluated = HashMap::with_capacity(args.len());
        for (arg_name, expr) in args {
            evaluated.insert(arg_name.to_string(), self.eval_expression(expr)?.into_owned());
        }
        Ok(evaluated)
    }

    fn eval_fn_call(&mut self, function_call: &'a Call) -> Result<Val<'a>> {
        if function_call.name == VARS_FUNCTION {
            return Ok(Cow::Owned(self.call_stack.current_context_cloned()));
        }

        let args = self.eval_args(&function_call.args)?;

        if helpers::is_view_helper(&function_call.name) {
            let rendered = helpers::call_view_helper(self.view, &function_call.name, &args)
                .map_err(|e| Error::call_function(&function_call.name, e))?;
            return Ok(Cow::Owned(Value::String(rendered)));
        }

        let view_fn = self.view.get_function(&function_call.name)?;
        let res = view_fn.call(&args).map_err(|e| Error::call_function(&function_call.name, e))?;
        Ok(Cow::Owned(res))
    }

    fn eval_filter(&mut self, value: &Val<'a>, fn_call: &'a Call) -> Result<Val<'a>> {
        let filter_fn = self.view.get_filter(&fn_call.name)?;
        let args = self.eval_args(&fn_call.args)?;

        let res = filter_fn.filter(value, &args).map_err(|e| Error::call_filter(&fn_call.name, e))?;
        Ok(Cow::Owned(res))
    }
}
