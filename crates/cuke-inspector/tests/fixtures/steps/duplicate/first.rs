use rstest_bdd_macros::{given, when};

#[given("an expression")]
fn first_expression() {}

#[when("an expression")]
fn second_expression() {}
