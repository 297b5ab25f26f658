use crate::parser::parse;

fn assert_err_msg(input: &str, needles: &[&str]) {
    let res = parse(input);
    assert!(res.is_err(), "{:?} should not parse", input);
    let err_msg = res.unwrap_err().to_string();
    println!("{}", err_msg);
    for needle in needles {
        assert!(err_msg.contains(needle), "{:?} not found in {}", needle, err_msg);
    }
}

#[test]
fn unterminated_variable_block() {
    assert_err_msg("{{ hey", &["1:", "expected"]);
}

#[test]
fn empty_variable_block() {
    assert_err_msg("{{}}", &["1:"]);
}

#[test]
fn unterminated_if() {
    assert_err_msg("{% if a %}hello", &["expected"]);
}

#[test]
fn unterminated_forloop() {
    assert_err_msg("{% for a in b %}hello", &["expected"]);
}

#[test]
fn stray_endfor() {
    assert_err_msg("hello{% endfor %}", &["1:"]);
}

#[test]
fn unterminated_comment() {
    assert_err_msg("{# hidden", &["1:"]);
}

#[test]
fn unknown_tag() {
    assert_err_msg("{% include \"a.phtml\" %}", &["1:"]);
}

#[test]
fn invalid_kwarg() {
    assert_err_msg("{{ partial(name) }}", &["1:"]);
}
