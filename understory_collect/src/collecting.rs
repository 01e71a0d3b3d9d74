// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping tree nodes so that mounting them contributes to a collector.
//!
//! ## Usage
//!
//! 1) Wrap a node with [`Collecting::with_item`] to contribute a fixed item, or
//!    with [`Collecting::manual`] to let the node report items itself.
//! 2) When the host mounts the node, call [`Collecting::mount`] with the
//!    [`CollectorHandle`] it received from its ancestors.
//! 3) When the host unmounts the node, call [`Mounted::unmount`] or simply drop
//!    the [`Mounted`] value; either way the fixed item is uncollected.
//!
//! ## Minimal example
//!
//! ```
//! use understory_collect::{Collecting, Collector, Component, ManualClock};
//!
//! struct Sidebar;
//!
//! impl Component for Sidebar {
//!     fn name(&self) -> Option<&str> {
//!         Some("Sidebar")
//!     }
//! }
//!
//! let mut collector = Collector::<&str>::builder()
//!     .clock(ManualClock::new())
//!     .on_change(|_| {})
//!     .build()
//!     .unwrap();
//!
//! let wrapped = Collecting::with_item("sidebar_reducer", Sidebar);
//! assert_eq!(wrapped.display_name(), "Collecting(Sidebar)");
//!
//! let mounted = wrapped.mount(&collector.handle());
//! collector.flush();
//! assert!(collector.contains(&"sidebar_reducer"));
//!
//! let _wrapped = mounted.unmount();
//! collector.flush();
//! assert!(collector.is_empty());
//! ```

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::hash::Hash;

use crate::collector::CollectorHandle;
use crate::contribution::Contribution;

/// Name used for an absent component.
pub const NULL_NAME: &str = "<Null>";

/// Name used for a component that does not report one.
pub const ANONYMOUS_NAME: &str = "<Anonymous>";

/// A node that can be wrapped by [`Collecting`].
///
/// The name is used only for diagnostics.
pub trait Component {
    /// Returns a human-readable name for debugging tools.
    fn name(&self) -> Option<&str> {
        None
    }
}

impl Component for () {}

impl Component for &str {
    fn name(&self) -> Option<&str> {
        Some(*self)
    }
}

/// Returns the diagnostic name of an optional component.
///
/// ```
/// use understory_collect::{Component, component_name};
///
/// struct Unnamed;
/// impl Component for Unnamed {}
///
/// assert_eq!(component_name(Some(&"Header")), "Header");
/// assert_eq!(component_name(Some(&Unnamed)), "<Anonymous>");
/// assert_eq!(component_name::<Unnamed>(None), "<Null>");
/// ```
#[must_use]
pub fn component_name<W>(component: Option<&W>) -> &str
where
    W: Component + ?Sized,
{
    match component {
        None => NULL_NAME,
        Some(component) => component.name().unwrap_or(ANONYMOUS_NAME),
    }
}

/// A component decorated with collection behavior.
///
/// With an item, mounting collects it and unmounting uncollects it. Without
/// one, the wrapped component is handed the [`CollectorHandle`] through
/// [`Mounted::handle`] and reports whatever it likes.
pub struct Collecting<T, W> {
    item: Option<T>,
    component: Option<W>,
}

impl<T, W> Collecting<T, W> {
    /// Wraps an optional component with an optional fixed item.
    #[must_use]
    pub fn new(item: Option<T>, component: Option<W>) -> Self {
        Self { item, component }
    }

    /// Wraps `component` so that it contributes `item` while mounted.
    #[must_use]
    pub fn with_item(item: T, component: W) -> Self {
        Self::new(Some(item), Some(component))
    }

    /// Wraps `component` without a fixed item.
    #[must_use]
    pub fn manual(component: W) -> Self {
        Self::new(None, Some(component))
    }

    /// Returns the fixed item, if any.
    #[must_use]
    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    /// Returns the wrapped component, if any.
    #[must_use]
    pub fn component(&self) -> Option<&W> {
        self.component.as_ref()
    }

    /// Consumes the wrapper, returning the item and component.
    pub fn into_parts(self) -> (Option<T>, Option<W>) {
        (self.item, self.component)
    }
}

impl<T, W> Collecting<T, W>
where
    W: Component,
{
    /// Returns `Collecting(<component name>)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("Collecting({})", component_name(self.component.as_ref()))
    }

    /// Returns `CollectorManager(<component name>)`, the name of the node that
    /// owns the mount/unmount behavior.
    #[must_use]
    pub fn manager_name(&self) -> String {
        format!("CollectorManager({})", component_name(self.component.as_ref()))
    }
}

impl<T, W> Collecting<T, W>
where
    T: Clone + Eq + Hash,
{
    /// Attaches the wrapper below a collector.
    ///
    /// If the wrapper carries an item, it is collected now.
    pub fn mount(self, handle: &CollectorHandle<T>) -> Mounted<T, W> {
        Mounted {
            handle: handle.clone(),
            contribution: self.item.map(|item| handle.contribute(item)),
            component: self.component,
        }
    }
}

impl<T, W> fmt::Debug for Collecting<T, W>
where
    T: fmt::Debug,
    W: Component,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collecting")
            .field("item", &self.item)
            .field("component", &component_name(self.component.as_ref()))
            .finish()
    }
}

/// A [`Collecting`] wrapper that is currently mounted.
///
/// Dropping it uncollects the fixed item, if any.
#[must_use = "dropping a mounted wrapper unmounts it"]
pub struct Mounted<T, W>
where
    T: Clone + Eq + Hash,
{
    handle: CollectorHandle<T>,
    contribution: Option<Contribution<T>>,
    component: Option<W>,
}

impl<T, W> Mounted<T, W>
where
    T: Clone + Eq + Hash,
{
    /// Returns the capability pair passed to the wrapped component.
    #[must_use]
    pub fn handle(&self) -> &CollectorHandle<T> {
        &self.handle
    }

    /// Returns the wrapped component, if any.
    #[must_use]
    pub fn component(&self) -> Option<&W> {
        self.component.as_ref()
    }

    /// Returns the wrapped component mutably, if any.
    #[must_use]
    pub fn component_mut(&mut self) -> Option<&mut W> {
        self.component.as_mut()
    }

    /// Returns the fixed item, if any.
    #[must_use]
    pub fn item(&self) -> Option<&T> {
        self.contribution.as_ref().map(Contribution::item)
    }

    /// Detaches the wrapper, uncollecting its fixed item.
    pub fn unmount(self) -> Collecting<T, W> {
        let item = self.contribution.map(Contribution::withdraw);
        Collecting::new(item, self.component)
    }
}

impl<T, W> fmt::Debug for Mounted<T, W>
where
    T: Clone + Eq + Hash + fmt::Debug,
    W: Component,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mounted")
            .field("item", &self.item())
            .field("component", &component_name(self.component.as_ref()))
            .field("attached", &self.handle.is_attached())
            .finish()
    }
}
