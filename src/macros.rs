//! Macros for composing plain functions and closures.

/// Compose functions from right to left.
///
/// `compose!(f, g, h)(x)` equals `f(g(h(x)))`. Unlike
/// [`compose`](crate::core::compose), the functions need not share one type
/// and need not be boxed; each output only has to match the next input.
///
/// - `compose!()` is the identity closure
/// - `compose!(f)` is `f` itself
///
/// # Example
///
/// ```
/// use statecell::compose;
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn double(x: i32) -> i32 { x * 2 }
///
/// let composed = compose!(add_one, double, |x: i32| x - 3);
/// assert_eq!(composed(5), 5);
///
/// let describe = compose!(|n: usize| format!("{n} chars"), str::len);
/// assert_eq!(describe("redux"), "5 chars");
///
/// assert_eq!(compose!()(7), 7);
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        (|value| value)
    };
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {{
        let outer = $f;
        let inner = $crate::compose!($($rest),+);
        move |value| outer(inner(value))
    }};
}

#[cfg(test)]
mod tests {
    fn add_one(x: i64) -> i64 {
        x + 1
    }

    fn double(x: i64) -> i64 {
        x * 2
    }

    #[test]
    fn empty_is_identity() {
        let identity = compose!();
        assert_eq!(identity("same"), "same");
    }

    #[test]
    fn single_function_is_unchanged() {
        let f = compose!(add_one);
        assert_eq!(f(1), 2);
    }

    #[test]
    fn applies_right_to_left() {
        assert_eq!(compose!(add_one, double)(5), 11);
        assert_eq!(compose!(double, add_one)(5), 12);
        assert_eq!(compose!(add_one, double, add_one,)(1), 5);
    }

    #[test]
    fn changes_types_along_the_chain() {
        let parse_then_square = compose!(|n: i64| n * n, |s: &str| {
            s.trim().parse::<i64>().unwrap_or(0)
        });
        assert_eq!(parse_then_square(" 12 "), 144);
    }

    #[test]
    fn matches_boxed_composition() {
        use crate::core::{compose, Composable};
        use std::sync::Arc;

        let boxed = compose(vec![
            Arc::new(add_one) as Composable<i64>,
            Arc::new(double) as Composable<i64>,
        ]);
        let inline = compose!(add_one, double);
        for x in -3..3 {
            assert_eq!(boxed(x), inline(x));
        }
    }
}
