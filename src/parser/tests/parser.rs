use std::collections::HashMap;

use serde_json::{json, Value};

use crate::parser::ast::*;
use crate::parser::parse;

fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

fn lit(value: Value) -> Expr {
    Expr::Literal(value)
}

/// Parses a template made of a single `{{ }}` tag
fn parse_output(input: &str) -> Expr {
    match parse(input).unwrap().remove(0) {
        Node::Output(expr) => expr,
        other => panic!("expected an output tag, got {:?}", other),
    }
}

#[test]
fn parse_empty_template() {
    assert!(parse("").unwrap().is_empty());
}

#[test]
fn parse_text() {
    let ast = parse("This is the first test partial\n").unwrap();
    assert_eq!(ast, vec![Node::Text("This is the first test partial\n".to_string())]);
}

#[test]
fn lone_braces_are_text() {
    let ast = parse("a { b } c").unwrap();
    assert_eq!(ast, vec![Node::Text("a { b } c".to_string())]);
}

#[test]
fn parse_comment() {
    let ast = parse("{# hidden #}shown{##}").unwrap();
    assert_eq!(
        ast,
        vec![
            Node::Comment(" hidden ".to_string()),
            Node::Text("shown".to_string()),
            Node::Comment(String::new()),
        ]
    );
}

#[test]
fn parse_variables() {
    assert_eq!(parse_output("{{ message }}"), ident("message"));
    assert_eq!(parse_output("{{ model.rows.0 }}"), ident("model.rows.0"));
}

#[test]
fn parse_literals() {
    let cases = vec![
        ("{{ 2 }}", json!(2)),
        ("{{ -2 }}", json!(-2)),
        ("{{ 3.5 }}", json!(3.5)),
        ("{{ \"hey\" }}", json!("hey")),
        ("{{ 'ho \"there\"' }}", json!("ho \"there\"")),
        ("{{ true }}", json!(true)),
        ("{{ null }}", json!(null)),
    ];

    for (input, expected) in cases {
        assert_eq!(parse_output(input), lit(expected), "{}", input);
    }
}

#[test]
fn integer_out_of_bounds_is_an_error() {
    let err = parse("{{ 99999999999999999999 }}").unwrap_err();
    assert_eq!(err.to_string(), "Integer out of bounds: `99999999999999999999`");
}

#[test]
fn keywords_prefixing_identifiers_stay_identifiers() {
    let ast = parse("{{ nullable }}{{ true_value }}{{ notes }}{{ order }}").unwrap();
    let names: Vec<_> = ast
        .into_iter()
        .map(|node| match node {
            Node::Output(Expr::Ident(name)) => name,
            other => panic!("unexpected node {:?}", other),
        })
        .collect();
    assert_eq!(names, vec!["nullable", "true_value", "notes", "order"]);
}

#[test]
fn parse_filters() {
    let mut join = Call::bare("join");
    join.args.insert("sep".to_string(), lit(json!(", ")));

    assert_eq!(
        parse_output("{{ names | join(sep=\", \") | upper }}"),
        Expr::Filtered {
            value: Box::new(ident("names")),
            filters: vec![join, Call::bare("upper")],
        }
    );
    assert!(parse_output("{{ names }}").filters().is_empty());
}

#[test]
fn parse_call_with_kwargs() {
    let mut args = HashMap::new();
    args.insert("name".to_string(), lit(json!("row.phtml")));
    args.insert("values".to_string(), ident("item"));

    assert_eq!(
        parse_output("{{ partial(name=\"row.phtml\", values=item,) }}"),
        Expr::Call(Call { name: "partial".to_string(), args })
    );
    assert_eq!(parse_output("{{ vars() }}"), Expr::Call(Call::bare("vars")));
}

#[test]
fn parse_array_literal() {
    assert_eq!(
        parse_output("{{ [1, 'a', [],] }}"),
        Expr::Array(vec![lit(json!(1)), lit(json!("a")), Expr::Array(vec![])])
    );
}

#[test]
fn and_binds_tighter_than_or() {
    let expected = Expr::Logic {
        lhs: Box::new(ident("a")),
        op: LogicOp::Or,
        rhs: Box::new(Expr::Logic {
            lhs: Box::new(ident("b")),
            op: LogicOp::And,
            rhs: Box::new(Expr::Not(Box::new(ident("c")))),
        }),
    };
    assert_eq!(parse_output("{{ a or b and not c }}"), expected);
}

#[test]
fn not_covers_the_whole_comparison() {
    assert_eq!(
        parse_output("{{ not kind != 'a' }}"),
        Expr::Not(Box::new(Expr::Compare {
            lhs: Box::new(ident("kind")),
            op: CompareOp::NotEq,
            rhs: Box::new(lit(json!("a"))),
        }))
    );
}

#[test]
fn comparison_operands_take_filters() {
    assert_eq!(
        parse_output("{{ rows | length == 2 }}"),
        Expr::Compare {
            lhs: Box::new(Expr::Filtered {
                value: Box::new(ident("rows")),
                filters: vec![Call::bare("length")],
            }),
            op: CompareOp::Eq,
            rhs: Box::new(lit(json!(2))),
        }
    );
}

#[test]
fn parse_set_tag() {
    assert_eq!(
        parse("{% set greeting = 'hi' %}").unwrap(),
        vec![Node::Set(Set { key: "greeting".to_string(), value: lit(json!("hi")) })]
    );
}

#[test]
fn parse_key_value_loop() {
    let ast = parse("{% for key, value in vars() %}{{ key }}: {{ value }}\n{% endfor %}").unwrap();
    assert_eq!(
        ast,
        vec![Node::Loop(Loop {
            key: Some("key".to_string()),
            value: "value".to_string(),
            container: Expr::Call(Call::bare("vars")),
            body: vec![
                Node::Output(ident("key")),
                Node::Text(": ".to_string()),
                Node::Output(ident("value")),
                Node::Text("\n".to_string()),
            ],
        })]
    );
}

#[test]
fn loop_variable_can_start_with_in() {
    match parse("{% for index in indexes | default(value=[]) %}{% endfor %}").unwrap().remove(0) {
        Node::Loop(for_loop) => {
            assert_eq!(for_loop.key, None);
            assert_eq!(for_loop.value, "index");
            assert_eq!(for_loop.container.source_name(), "indexes");
            assert!(for_loop.body.is_empty());
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn parse_if_elif_else() {
    assert_eq!(
        parse("{% if a %}A{% elif b %}B{% else %}C{% endif %}").unwrap(),
        vec![Node::If(Conditional {
            branches: vec![
                (ident("a"), vec![Node::Text("A".to_string())]),
                (ident("b"), vec![Node::Text("B".to_string())]),
            ],
            otherwise: Some(vec![Node::Text("C".to_string())]),
        })]
    );
}

#[test]
fn parse_nested_blocks() {
    let ast = parse("{% for r in rows %}{% if r %}{{ r }}{% endif %}{% endfor %}").unwrap();
    match ast[0] {
        Node::Loop(ref for_loop) => match for_loop.body[0] {
            Node::If(ref conditional) => {
                assert_eq!(conditional.branches.len(), 1);
                assert_eq!(conditional.otherwise, None);
            }
            ref other => panic!("unexpected node {:?}", other),
        },
        ref other => panic!("unexpected node {:?}", other),
    }
}
