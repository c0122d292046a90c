use rstest_bdd_macros::then;

mod nested {
    use super::then;

    #[then("an expression")]
    pub fn third_expression() {}
}
