//! Single-slot memoization for derivation stages.
//!
//! A [`Memo`] remembers the most recent input key and the value computed for
//! it. Values are shared through `Arc`, so an unchanged input hands back the
//! same allocation and downstream consumers can detect "no change" by pointer
//! comparison. The slot is an `ArcSwapOption`, making the memo usable from
//! several threads without locking; racing misses each compute their own
//! value and the last store wins.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

struct Cached<K, V> {
	key: K,
	value: Arc<V>,
}

/// Remembers the last computed value of one stage.
pub struct Memo<K, V> {
	stage: &'static str,
	slot: ArcSwapOption<Cached<K, V>>,
}

impl<K, V> Memo<K, V> {
	/// Creates an empty memo; `stage` only labels log output.
	pub fn new(stage: &'static str) -> Self {
		Self {
			stage,
			slot: ArcSwapOption::empty(),
		}
	}

	/// Returns the cached value if `is_current` accepts the cached key,
	/// otherwise runs `compute` and caches the key and value it returns.
	pub fn get_or_compute<F, C>(&self, is_current: F, compute: C) -> Arc<V>
	where
		F: FnOnce(&K) -> bool,
		C: FnOnce() -> (K, V),
	{
		{
			let cached = self.slot.load();
			if let Some(cached) = &*cached {
				if is_current(&cached.key) {
					tracing::trace!(stage = self.stage, "Reusing memoized value");
					return Arc::clone(&cached.value);
				}
			}
		}

		tracing::debug!(stage = self.stage, "Recomputing");
		let (key, value) = compute();
		let value = Arc::new(value);
		self.slot.store(Some(Arc::new(Cached {
			key,
			value: Arc::clone(&value),
		})));
		value
	}

	/// Drops the cached value so the next call recomputes.
	pub fn clear(&self) {
		self.slot.store(None);
	}
}
