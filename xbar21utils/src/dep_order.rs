//!
//! # Dependency-Ordering Trait and Helpers
//!

// Std-lib
use std::collections::HashSet;
use std::marker::PhantomData;

///
/// # Dependency-Ordering Trait
///
/// Canvases embed other canvases, and exporters which write one definition per canvas
/// must write each after everything it references.
/// [DepOrder] produces that ordering from a user-defined `process` method,
/// which pushes each direct dependency of `item` via `orderer.push`.
/// Traversal is depth-first; re-entering an item still in progress is a cycle,
/// and is reported through `fail`.
///
/// ```rust
/// use xbar21utils::{DepOrder, DepOrderer};
///
/// struct Chain;
/// impl DepOrder for Chain {
///     type Item = usize;
///     type Error = String;
///     fn process(item: &usize, orderer: &mut DepOrderer<Self>) -> Result<(), String> {
///         if *item > 0 {
///             orderer.push(&(item - 1))?;
///         }
///         Ok(())
///     }
///     fn fail(item: &usize) -> Result<(), String> {
///         Err(format!("cycle at {}", item))
///     }
/// }
/// assert_eq!(Chain::order(&[2]), Ok(vec![0, 1, 2]));
/// ```
///
pub trait DepOrder: Sized {
    /// Item Type. Typically pointers or keys to the nodes in the dependency graph.
    type Item: Clone + Eq + std::hash::Hash;
    /// Error Type
    type Error;

    /// Dependency-order all entries in slice `items`
    fn order(items: &[Self::Item]) -> Result<Vec<Self::Item>, Self::Error> {
        DepOrderer::<Self>::order(items)
    }
    /// Process a single `item`, pushing each of its direct dependencies
    fn process(item: &Self::Item, orderer: &mut DepOrderer<Self>) -> Result<(), Self::Error>;
    /// Failure-handler, called with the item at which a cycle was detected
    fn fail(item: &Self::Item) -> Result<(), Self::Error>;
}

/// # Dependency Order Helper
/// Public solely for use in the call-signature of [DepOrder::process].
pub struct DepOrderer<P: DepOrder> {
    /// Ordered, completed items
    stack: Vec<P::Item>,
    /// Completed items, for quick membership tests
    seen: HashSet<P::Item>,
    /// Open recursive frames
    pending: HashSet<P::Item>,
    p: PhantomData<P>,
}
impl<P: DepOrder> DepOrderer<P> {
    /// Dependency-order all entries in slice `items`
    pub fn order(items: &[P::Item]) -> Result<Vec<P::Item>, P::Error> {
        let len = items.len();
        let mut this = Self {
            stack: Vec::with_capacity(len),
            seen: HashSet::with_capacity(len),
            pending: HashSet::new(),
            p: PhantomData,
        };
        for item in items.iter() {
            this.push(item)?;
        }
        Ok(this.stack)
    }
    /// Push `item`'s dependencies, and then itself, onto the stack
    pub fn push(&mut self, item: &P::Item) -> Result<(), P::Error> {
        if self.seen.contains(item) {
            return Ok(());
        }
        if !self.pending.insert(item.clone()) {
            return P::fail(item);
        }
        P::process(item, self)?;
        self.pending.remove(item);
        self.seen.insert(item.clone());
        self.stack.push(item.clone());
        Ok(())
    }
}
