//! Glue for the missing and unused step fixtures.

use rstest_bdd_macros::{given, then};

#[given("a precondition")]
fn a_precondition() {}

#[given("a basket with {count:u32} items")]
fn a_basket(count: u32) {
    let _ = count;
}

#[then("an unrelated outcome")]
fn unrelated_outcome() {}
