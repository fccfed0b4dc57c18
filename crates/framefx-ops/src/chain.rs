//! Ordered, mutable filter chain.
//!
//! The chain holds each active filter exactly once, in application order,
//! alongside a status table with one flag per filter. The two are only
//! changed together, so the set of ids in the chain always equals the set of
//! filters whose status is active.
//!
//! # Example
//!
//! ```rust
//! use framefx_ops::{FilterChain, FilterId};
//!
//! let mut chain = FilterChain::new();
//! chain.toggle(FilterId::Gray);
//! chain.toggle(FilterId::Sobel);
//! chain.move_up(FilterId::Sobel);
//! assert_eq!(chain.ids(), &[FilterId::Sobel, FilterId::Gray]);
//!
//! assert!(chain.toggle_named("vignette").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::{FilterId, OpsError, OpsResult};

/// One active/inactive flag per filter; initially all inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStatus {
    active: [bool; FilterId::COUNT],
}

impl FilterStatus {
    /// Whether `id` is active.
    #[inline]
    pub fn is_active(&self, id: FilterId) -> bool {
        self.active[id.index()]
    }

    /// Every filter with its flag, in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterId, bool)> + '_ {
        FilterId::ALL.into_iter().map(|id| (id, self.is_active(id)))
    }

    /// Number of active filters.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    fn set(&mut self, id: FilterId, active: bool) {
        self.active[id.index()] = active;
    }
}

/// Ordered sequence of active filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterChain {
    order: Vec<FilterId>,
    status: FilterStatus,
}

impl FilterChain {
    /// Empty chain, every filter inactive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the status of `id`.
    ///
    /// Activation appends to the end of the chain; deactivation removes the
    /// single occurrence. Returns the new status.
    pub fn toggle(&mut self, id: FilterId) -> bool {
        let active = !self.status.is_active(id);
        if active {
            self.order.push(id);
        } else {
            self.order.retain(|&x| x != id);
        }
        self.status.set(id, active);
        debug!(filter = %id, active, chain = %self, "Toggled filter");
        active
    }

    /// Swaps `id` with its predecessor.
    ///
    /// No-op if `id` is inactive or already first.
    pub fn move_up(&mut self, id: FilterId) {
        if let Some(pos) = self.position(id) {
            if pos > 0 {
                self.order.swap(pos, pos - 1);
                debug!(filter = %id, chain = %self, "Moved filter up");
            }
        }
    }

    /// Swaps `id` with its successor.
    ///
    /// No-op if `id` is inactive or already last.
    pub fn move_down(&mut self, id: FilterId) {
        if let Some(pos) = self.position(id) {
            if pos + 1 < self.order.len() {
                self.order.swap(pos, pos + 1);
                debug!(filter = %id, chain = %self, "Moved filter down");
            }
        }
    }

    /// [`toggle`](Self::toggle) by name.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidFilterId`] for an unknown name; the chain is not
    /// modified.
    pub fn toggle_named(&mut self, name: &str) -> OpsResult<bool> {
        let id = name.parse()?;
        Ok(self.toggle(id))
    }

    /// [`move_up`](Self::move_up) by name.
    pub fn move_up_named(&mut self, name: &str) -> OpsResult<()> {
        self.move_up(name.parse()?);
        Ok(())
    }

    /// [`move_down`](Self::move_down) by name.
    pub fn move_down_named(&mut self, name: &str) -> OpsResult<()> {
        self.move_down(name.parse()?);
        Ok(())
    }

    /// Active filters in application order.
    #[inline]
    pub fn ids(&self) -> &[FilterId] {
        &self.order
    }

    /// Status table.
    #[inline]
    pub fn status(&self) -> &FilterStatus {
        &self.status
    }

    /// Whether `id` is active.
    #[inline]
    pub fn contains(&self, id: FilterId) -> bool {
        self.status.is_active(id)
    }

    /// Number of active filters.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no filter is active.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates active filters in order.
    pub fn iter(&self) -> impl Iterator<Item = FilterId> + '_ {
        self.order.iter().copied()
    }

    fn position(&self, id: FilterId) -> Option<usize> {
        if !self.status.is_active(id) {
            return None;
        }
        self.order.iter().position(|&x| x == id)
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.order.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(id.name())?;
        }
        Ok(())
    }
}

/// Parses a comma-separated list such as `gray,sobel`.
///
/// Each name is activated in order. Empty input gives an empty chain.
impl FromStr for FilterChain {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chain = Self::new();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let id: FilterId = name.parse()?;
            if chain.contains(id) {
                return Err(OpsError::InvalidParameter(format!("filter '{id}' listed twice")));
            }
            chain.toggle(id);
        }
        Ok(chain)
    }
}
