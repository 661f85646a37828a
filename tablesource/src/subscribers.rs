use alloc::boxed::Box;
use alloc::vec::Vec;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// A synchronous, multicast observer registry.
///
/// `publish` calls every current subscriber in subscription order before it returns.
pub struct Subscribers<A: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn FnMut(&A)>)>,
}

impl<A: ?Sized> Subscribers<A> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, f: impl FnMut(&A) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(f)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }

    pub fn publish(&mut self, value: &A) {
        for (_, f) in self.entries.iter_mut() {
            f(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: ?Sized> Default for Subscribers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> core::fmt::Debug for Subscribers<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}
