use std::collections::HashMap;

use lazy_static::lazy_static;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use serde_json::Value;

use crate::errors::{Error, Result as VignetteResult};

// This include forces recompiling this source file if the grammar file changes.
const _GRAMMAR: &str = include_str!("vignette.pest");

#[derive(Parser)]
#[grammar = "parser/vignette.pest"]
pub struct VignetteParser;

/// The AST of a template
pub mod ast;

#[cfg(test)]
mod tests;

use self::ast::*;

lazy_static! {
    static ref LOGIC_PARSER: PrattParser<Rule> = PrattParser::new()
        .op(Op::infix(Rule::op_or, Assoc::Left))
        .op(Op::infix(Rule::op_and, Assoc::Left));
}

/// Takes the next child of a `parent` pair; the grammar guarantees it is there
fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, parent: Rule) -> VignetteResult<Pair<'i, Rule>> {
    pairs.next().ok_or_else(|| Error::msg(format!("Incomplete {:?} in the parse tree", parent)))
}

fn parse_kwarg(pair: Pair<Rule>) -> VignetteResult<(String, Expr)> {
    let mut inner = pair.into_inner();
    let name = next_pair(&mut inner, Rule::kwarg)?.as_str().to_string();
    let value = parse_expr(next_pair(&mut inner, Rule::kwarg)?)?;
    Ok((name, value))
}

fn parse_call(pair: Pair<Rule>) -> VignetteResult<Call> {
    let mut inner = pair.into_inner();
    let name = next_pair(&mut inner, Rule::call)?.as_str().to_string();
    let args = inner.map(parse_kwarg).collect::<VignetteResult<HashMap<_, _>>>()?;
    Ok(Call { name, args })
}

fn parse_filter(pair: Pair<Rule>) -> VignetteResult<Call> {
    let filter = next_pair(&mut pair.into_inner(), Rule::filter)?;
    match filter.as_rule() {
        Rule::call => parse_call(filter),
        _ => Ok(Call::bare(filter.as_str())),
    }
}

fn parse_operand(pair: Pair<Rule>) -> VignetteResult<Expr> {
    let text = pair.as_str();
    let expr = match pair.as_rule() {
        Rule::int => {
            let int: i64 = text
                .parse()
                .map_err(|_| Error::msg(format!("Integer out of bounds: `{}`", text)))?;
            Expr::Literal(Value::from(int))
        }
        Rule::float => {
            let float: f64 =
                text.parse().map_err(|_| Error::msg(format!("Invalid float: `{}`", text)))?;
            Expr::Literal(Value::from(float))
        }
        Rule::boolean => Expr::Literal(Value::Bool(text == "true")),
        Rule::null => Expr::Literal(Value::Null),
        // drop the quotes
        Rule::string => Expr::Literal(Value::String(text[1..text.len() - 1].to_string())),
        Rule::array => {
            Expr::Array(pair.into_inner().map(parse_expr).collect::<VignetteResult<_>>()?)
        }
        Rule::call => Expr::Call(parse_call(pair)?),
        Rule::variable => Expr::Ident(text.to_string()),
        rule => unreachable!("{:?} is not an operand: {}", rule, text),
    };

    Ok(expr)
}

fn parse_pipeline(pair: Pair<Rule>) -> VignetteResult<Expr> {
    let mut inner = pair.into_inner();
    let value = parse_operand(next_pair(&mut inner, Rule::pipeline)?)?;
    let filters = inner.map(parse_filter).collect::<VignetteResult<Vec<_>>>()?;

    if filters.is_empty() {
        return Ok(value);
    }
    Ok(Expr::Filtered { value: Box::new(value), filters })
}

fn parse_comparison(pair: Pair<Rule>) -> VignetteResult<Expr> {
    let mut inner = pair.into_inner();
    let lhs = parse_pipeline(next_pair(&mut inner, Rule::comparison)?)?;

    let op = match inner.next() {
        Some(op) if op.as_rule() == Rule::op_eq => CompareOp::Eq,
        Some(_) => CompareOp::NotEq,
        None => return Ok(lhs),
    };
    let rhs = parse_pipeline(next_pair(&mut inner, Rule::comparison)?)?;

    Ok(Expr::Compare { lhs: Box::new(lhs), op, rhs: Box::new(rhs) })
}

/// `not` applies to the whole comparison, filters included
fn parse_term(pair: Pair<Rule>) -> VignetteResult<Expr> {
    let mut inner = pair.into_inner();
    let first = next_pair(&mut inner, Rule::term)?;
    if first.as_rule() != Rule::op_not {
        return parse_comparison(first);
    }

    let negated = parse_comparison(next_pair(&mut inner, Rule::term)?)?;
    Ok(Expr::Not(Box::new(negated)))
}

fn parse_expr(pair: Pair<Rule>) -> VignetteResult<Expr> {
    LOGIC_PARSER
        .map_primary(parse_term)
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::op_or => LogicOp::Or,
                Rule::op_and => LogicOp::And,
                rule => unreachable!("{:?} is not a logic operator", rule),
            };
            Ok(Expr::Logic { lhs: Box::new(lhs?), op, rhs: Box::new(rhs?) })
        })
        .parse(pair.into_inner())
}

/// The single expression held by a tag
fn parse_tag_expr(pair: Pair<Rule>) -> VignetteResult<Expr> {
    let rule = pair.as_rule();
    parse_expr(next_pair(&mut pair.into_inner(), rule)?)
}

fn parse_set_tag(pair: Pair<Rule>) -> VignetteResult<Node> {
    let mut inner = pair.into_inner();
    let key = next_pair(&mut inner, Rule::set_tag)?.as_str().to_string();
    let value = parse_expr(next_pair(&mut inner, Rule::set_tag)?)?;
    Ok(Node::Set(Set { key, value }))
}

fn parse_for_block(pair: Pair<Rule>) -> VignetteResult<Node> {
    let mut inner = pair.into_inner();
    let mut tag = next_pair(&mut inner, Rule::for_block)?.into_inner();

    let first = next_pair(&mut tag, Rule::for_tag)?.as_str().to_string();
    let second = next_pair(&mut tag, Rule::for_tag)?;
    let (key, value, container) = if second.as_rule() == Rule::ident {
        (Some(first), second.as_str().to_string(), next_pair(&mut tag, Rule::for_tag)?)
    } else {
        (None, first, second)
    };
    let body = parse_content(next_pair(&mut inner, Rule::for_block)?)?;

    Ok(Node::Loop(Loop { key, value, container: parse_pipeline(container)?, body }))
}

fn parse_if_block(pair: Pair<Rule>) -> VignetteResult<Node> {
    let mut branches = vec![];
    let mut otherwise = None;

    // tags alternate with the content they guard
    let mut inner = pair.into_inner();
    while let Some(tag) = inner.next() {
        match tag.as_rule() {
            Rule::if_tag | Rule::elif_tag => {
                let condition = parse_tag_expr(tag)?;
                let body = parse_content(next_pair(&mut inner, Rule::if_block)?)?;
                branches.push((condition, body));
            }
            Rule::else_tag => {
                otherwise = Some(parse_content(next_pair(&mut inner, Rule::if_block)?)?);
            }
            Rule::endif_tag => break,
            rule => unreachable!("unexpected {:?} in an if block", rule),
        }
    }

    Ok(Node::If(Conditional { branches, otherwise }))
}

fn parse_content(pair: Pair<Rule>) -> VignetteResult<Vec<Node>> {
    pair.into_inner()
        .map(|p| -> VignetteResult<Node> {
            match p.as_rule() {
                Rule::text => Ok(Node::Text(p.as_str().to_string())),
                Rule::output_tag => Ok(Node::Output(parse_tag_expr(p)?)),
                Rule::comment_tag => {
                    let text = p.into_inner().next().map(|t| t.as_str().to_string());
                    Ok(Node::Comment(text.unwrap_or_default()))
                }
                Rule::set_tag => parse_set_tag(p),
                Rule::for_block => parse_for_block(p),
                Rule::if_block => parse_if_block(p),
                rule => unreachable!("unexpected {:?} in template content", rule),
            }
        })
        .collect()
}

fn describe_rule(rule: &Rule) -> String {
    let description = match *rule {
        Rule::EOI => "end of input",
        Rule::int => "an integer",
        Rule::float => "a float",
        Rule::string | Rule::double_quoted | Rule::single_quoted => "a string",
        Rule::boolean => "`true` or `false`",
        Rule::null => "`null`",
        Rule::ident => "a name (letters, digits and `_`, not starting with a digit)",
        Rule::variable => "a variable, optionally dotted (`user.name`)",
        Rule::array => "an array (`[a, b]`)",
        Rule::call => "a call (`name(key=value)`)",
        Rule::kwarg => "a keyword argument (`key=value`)",
        Rule::filter => "a filter (`| name`)",
        Rule::pipeline => "a value with optional filters",
        Rule::comparison | Rule::term | Rule::expr => "an expression",
        Rule::op_or => "`or`",
        Rule::op_and => "`and`",
        Rule::op_not => "`not`",
        Rule::op_eq => "`==`",
        Rule::op_neq => "`!=`",
        Rule::output_tag => "an output tag (`{{ ... }}`)",
        Rule::comment_tag => "a comment (`{# ... #}`)",
        Rule::comment_text => "the text of a comment",
        Rule::set_tag => "a `set` tag",
        Rule::for_tag | Rule::for_block => "a loop (`{% for x in items %}...{% endfor %}`)",
        Rule::endfor_tag => "`{% endfor %}`",
        Rule::if_tag | Rule::if_block => "an `if` tag",
        Rule::elif_tag => "an `elif` tag",
        Rule::else_tag => "an `else` tag",
        Rule::endif_tag => "`{% endif %}`",
        Rule::text => "some text",
        Rule::content => "some content",
        Rule::template => "a template",
        _ => return format!("{:?}", rule),
    };
    description.to_string()
}

/// Parses a template source into its nodes
pub fn parse(input: &str) -> VignetteResult<Vec<Node>> {
    let mut pairs = VignetteParser::parse(Rule::template, input)
        .map_err(|e| Error::msg(e.renamed_rules(describe_rule)))?;
    let template = next_pair(&mut pairs, Rule::template)?;

    match template.into_inner().next() {
        Some(content) if content.as_rule() == Rule::content => parse_content(content),
        _ => Ok(vec![]),
    }
}
