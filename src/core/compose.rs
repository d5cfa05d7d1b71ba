//! Right-to-left function composition.
//!
//! The middleware pipeline folds its chain links with [`compose`], and store
//! enhancers are combined with it before being handed to the store.

use std::sync::Arc;

/// A shareable unary function from `T` to `T`.
pub type Composable<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Compose unary functions from right to left.
///
/// `compose(vec![f, g, h])(x)` equals `f(g(h(x)))`. No functions yield the
/// identity function; a single function is returned unchanged.
///
/// # Example
///
/// ```rust
/// use statecell::core::{compose, Composable};
/// use std::sync::Arc;
///
/// let add_one: Composable<i32> = Arc::new(|x| x + 1);
/// let double: Composable<i32> = Arc::new(|x| x * 2);
///
/// let composed = compose(vec![add_one, double]);
/// assert_eq!(composed(5), 11);
///
/// let identity = compose::<i32>(Vec::new());
/// assert_eq!(identity(7), 7);
/// ```
pub fn compose<T: 'static>(funcs: Vec<Composable<T>>) -> Composable<T> {
    funcs
        .into_iter()
        .reduce(|outer, inner| -> Composable<T> { Arc::new(move |value| outer(inner(value))) })
        .unwrap_or_else(|| -> Composable<T> { Arc::new(|value: T| value) })
}
