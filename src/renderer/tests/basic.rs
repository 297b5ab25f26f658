use std::collections::HashMap;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::errors::Result;
use crate::variables::Variables;
use crate::view::View;

use super::Review;

fn render_template(content: &str, context: &Variables) -> Result<String> {
    let view = View::new();
    view.add_raw_template("hello.html", content).unwrap();
    view.register_function("get_number", |_: &HashMap<String, Value>| -> Result<Value> {
        Ok(Value::Number(10.into()))
    });
    view.register_function("get_string", |_: &HashMap<String, Value>| -> Result<Value> {
        Ok(Value::String("Hello".to_string()))
    });

    view.render("hello.html", Some(context.clone()))
}

#[test]
fn render_simple_string() {
    let result = render_template("<h1>Hello world</h1>", &Variables::new());
    assert_eq!(result.unwrap(), "<h1>Hello world</h1>".to_owned());
}

#[test]
fn render_variable_block_lit_expr() {
    let inputs = vec![
        ("{{ 1 }}", "1"),
        ("{{ 3.14 }}", "3.14"),
        ("{{ -2 }}", "-2"),
        ("{{ \"hey\" }}", "hey"),
        (r#"{{ "{{ hey }}" }}"#, "{{ hey }}"),
        ("{{ true }}", "true"),
        ("{{ false }}", "false"),
        ("{{ null }}", ""),
        ("{{ [1, \"a\", true] }}", "[1, a, true]"),
        ("{{ true and 10 }}", "true"),
        ("{{ true and not 10 }}", "false"),
        ("{{ not true }}", "false"),
        ("{{ 1 == 1.0 }}", "true"),
        ("{{ \"a\" != \"b\" }}", "true"),
        ("{{ false or \"\" }}", "false"),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, &Variables::new()).unwrap(), expected);
    }
}

#[test]
fn render_variable_block_ident() {
    let mut context = Variables::new();
    context.insert("name", &"john");
    context.insert("malicious", &"<html>");
    context.insert("a", &2);
    context.insert("numbers", &vec![1, 2, 3]);
    context.insert("review", &Review::new());
    context.insert("with_newline", &"Animal Alphabets\nB is for Bee-Eater");

    let inputs = vec![
        ("{{ name }}", "john"),
        ("{{ malicious }}", "&lt;html&gt;"),
        ("{{ \"<html>\" }}", "&lt;html&gt;"),
        ("{{ malicious | safe }}", "<html>"),
        ("{{ malicious | upper }}", "&lt;HTML&gt;"),
        ("{{ malicious | upper | safe }}", "<HTML>"),
        ("{{ a }}", "2"),
        ("{{ numbers }}", "[1, 2, 3]"),
        ("{{ numbers.1 }}", "2"),
        ("{{ review.title }}", "My review"),
        ("{{ review.paragraphs.2 }}", "C"),
        ("{{ review }}", "[object]"),
        ("{{ with_newline }}", "Animal Alphabets\nB is for Bee-Eater"),
        ("{{ get_number() }}", "10"),
        ("{{ get_string() | lower }}", "hello"),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, &context).unwrap(), expected);
    }
}

#[test]
fn undefined_variables_render_empty() {
    let inputs = vec![
        ("{{ nope }}", ""),
        ("{{ nope.deeper.still }}", ""),
        ("{{ nope | default(value=\"fallback\") }}", "fallback"),
        ("{% if nope %}yes{% else %}no{% endif %}", "no"),
        ("{% for i in nope %}{{ i }}{% endfor %}", ""),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, &Variables::new()).unwrap(), expected);
    }
}

#[test]
fn render_filters() {
    let mut context = Variables::new();
    context.insert("tags", &vec!["rust", "views"]);
    context.insert("padded", &"  hi  ");
    context.insert("long", &"partial templates");

    let inputs = vec![
        ("{{ tags | join(sep=\", \") }}", "rust, views"),
        ("{{ tags | length }}", "2"),
        ("{{ padded | trim }}", "hi"),
        ("{{ long | truncate(length=7) }}", "partial…"),
        ("{{ long | upper | truncate(length=7, end=\"!\") }}", "PARTIAL!"),
        ("{{ \"<b>\" | escape | safe }}", "&lt;b&gt;"),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, &context).unwrap(), expected);
    }
}

#[test]
fn comments_render_nothing() {
    let result = render_template("Hello {# not {{ shown }} #}world", &Variables::new());
    assert_eq!(result.unwrap(), "Hello world");
}

#[test]
fn render_if_elif_else() {
    let mut context = Variables::new();
    context.insert("is_true", &true);
    context.insert("is_false", &false);
    context.insert("age", &18);
    context.insert("name", &"john");
    context.insert("empty_string", &"");
    context.insert("numbers", &vec![1, 2, 3]);
    context.insert("empty", &json!({}));

    let inputs = vec![
        ("{% if is_true %}Admin{% endif %}", "Admin"),
        ("{% if is_true %}Admin{% else %}User{% endif %}", "Admin"),
        ("{% if is_false %}Admin{% else %}User{% endif %}", "User"),
        ("{% if age == 18 %}Adult{% endif %}", "Adult"),
        ("{% if age != 18 %}Minor{% else %}Adult{% endif %}", "Adult"),
        ("{% if name == \"john\" and age == 18 %}Both{% endif %}", "Both"),
        ("{% if is_false or numbers %}Either{% endif %}", "Either"),
        ("{% if not empty_string %}Empty{% endif %}", "Empty"),
        ("{% if empty %}Full{% else %}Empty{% endif %}", "Empty"),
        ("{% if is_false %}A{% elif age == 1 %}B{% elif is_true %}C{% else %}D{% endif %}", "C"),
        ("{% if numbers | length == 3 %}Three{% endif %}", "Three"),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, &context).unwrap(), expected);
    }
}

#[test]
fn render_for() {
    let mut context = Variables::new();
    let mut map = HashMap::new();
    map.insert("name", "bob");
    map.insert("age", "18");

    context.insert("data", &vec![1, 2, 3]);
    context.insert("notes", &vec![1, 2, 3]);
    context.insert("vectors", &vec![vec![0, 3, 6], vec![1, 4, 7]]);
    context.insert("vectors_some_empty", &vec![vec![0, 3, 6], vec![], vec![1, 4, 7]]);
    context.insert("map", &map);
    context.insert("truthy", &2);

    let inputs = vec![
        ("{% for i in data %}{{i}}{% endfor %}", "123"),
        ("{% for key, val in map %}{{key}}:{{val}} {% endfor %}", "age:18 name:bob "),
        (
            "{% for i in data %}{{loop.index}}{{loop.index0}}{{loop.first}}{{loop.last}}{% endfor %}",
            "10truefalse21falsefalse32falsetrue",
        ),
        (
            "{% for vector in vectors %}{% for j in vector %}{{ j }}{% endfor %}{% endfor %}",
            "036147",
        ),
        (
            "{% for vector in vectors_some_empty %}{% for j in vector %}{{ j }}{% endfor %}{% endfor %}",
            "036147",
        ),
        ("{% for i in [1, 2] %}{{ i }}{% endfor %}", "12"),
        ("{% for note in notes %}{% if loop.last %}{{ note }}{% endif %}{% endfor %}", "3"),
        ("{% for i in data %}{% if i == truthy %}two{% endif %}{% endfor %}", "two"),
        // outer loop variables are visible in inner loops
        (
            "{% for i in data %}{% for j in [0] %}{{ i }}{% endfor %}{% endfor %}",
            "123",
        ),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, &context).unwrap(), expected);
    }
}

#[test]
fn render_set() {
    let mut context = Variables::new();
    context.insert("name", &"john");
    context.insert("data", &vec![1, 2]);

    let inputs = vec![
        ("{% set greeting = \"hi\" %}{{ greeting }} {{ name }}", "hi john"),
        ("{% set name = name | upper %}{{ name }}", "JOHN"),
        ("{% set user = vars() %}{{ user.name }}", "john"),
        // values set in a loop only live for that iteration
        ("{% for i in data %}{% set x = i %}{{ x }}{% endfor %}{{ x }}", "12"),
        ("{% set list = [name, \"doe\"] %}{{ list | join(sep=\" \") }}", "john doe"),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, &context).unwrap(), expected);
    }
}

#[test]
fn vars_sees_loop_and_set_values() {
    let mut context = Variables::new();
    context.insert("a", &1);

    let result = render_template(
        "{% set b = 2 %}{% for c in [3] %}{% for k, v in vars() %}{{ k }}={{ v }};{% endfor %}{% endfor %}",
        &context,
    );
    assert_eq!(result.unwrap(), "a=1;b=2;c=3;");
}

#[test]
fn autoescape_only_for_html_like_names() {
    let view = View::new();
    view.add_raw_template("raw.txt", "{{ content }}").unwrap();
    view.add_raw_template("page.xml", "{{ content }}").unwrap();
    view.vars_mut().insert("content", &"<a href='/'>");

    assert_eq!(view.render("raw.txt", None).unwrap(), "<a href='/'>");
    assert_eq!(
        view.render("page.xml", None).unwrap(),
        "&lt;a href=&#x27;&#x2F;&#x27;&gt;"
    );
}
