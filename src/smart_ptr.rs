//! Single-threaded shared-ownership handle.
//!
//! A [`SharedPtr<T>`] is either empty or owns a share of one heap resource.
//! Every owning handle points at a control block that lives in the same
//! allocation as the resource and carries the share count together with the
//! resource's concrete runtime type. Cloning a handle adds a share, dropping
//! one removes it, and the share that brings the count to zero destroys the
//! resource and the block in one step.
//!
//! Handles can change their view of the resource without touching the
//! resource itself:
//!
//! * [`SharedPtr::upcast`] moves to any view the compiler can prove, such as
//!   `dyn Trait` from a concrete type;
//! * [`SharedPtr::downcast`] goes back to the concrete type after checking the
//!   type recorded in the control block;
//! * [`SharedPtr::static_view`] reinterprets without any check.
//!
//! Each of them produces a new owner of the same resource, so the count grows
//! by one and the source handle is left as it was.
//!
//! ```
//! use design_patterns::SharedPtr;
//! use std::fmt::Debug;
//!
//! let a = SharedPtr::new(10);
//! let b = a.clone();
//! assert_eq!(SharedPtr::use_count(&a), 2);
//! assert!(a == b);
//!
//! let view: SharedPtr<dyn Debug> = SharedPtr::upcast::<dyn Debug>(&a, |n| n);
//! assert_eq!(SharedPtr::use_count(&b), 3);
//!
//! let back = SharedPtr::downcast::<i32>(&view).unwrap();
//! assert_eq!(*back, 10);
//! assert!(SharedPtr::downcast::<String>(&view).is_err());
//! ```
//!
//! Like `Rc`, the handle's own operations are associated functions
//! (`SharedPtr::use_count(&p)`), so method calls on a handle always reach the
//! resource. The count is a plain `Cell`, so handles are neither `Send` nor
//! `Sync`.

use std::any::{type_name, Any, TypeId};
use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::Deref;
use std::ptr::{self, NonNull};

use log::{debug, error, trace};

use crate::error::CastError;

// =============================================================================
// Control block
// =============================================================================

struct ControlBlock {
    count: Cell<usize>,
    type_id: TypeId,
    type_name: &'static str,
    destroy: unsafe fn(NonNull<ControlBlock>),
}

/// Resource and block share one allocation. `repr(C)` keeps the block at
/// offset zero so a block pointer is also a pointer to the allocation.
#[repr(C)]
struct Allocation<T> {
    block: ControlBlock,
    resource: ManuallyDrop<T>,
}

impl ControlBlock {
    fn acquire(&self) {
        let count = self.count.get();
        if count == 0 || count == usize::MAX {
            error!(
                "acquire on control block of {} with count {count}",
                self.type_name
            );
            std::process::abort();
        }
        self.count.set(count + 1);
        trace!("acquire {} -> {}", self.type_name, count + 1);
    }

    /// Drops one share and destroys the allocation when it was the last.
    ///
    /// # Safety
    ///
    /// `block` must come from a live owning handle, and that handle must not
    /// touch the block again.
    unsafe fn release(block: NonNull<ControlBlock>) {
        let header = block.as_ref();
        let count = header.count.get();
        if count == 0 {
            error!("release on dead control block of {}", header.type_name);
            std::process::abort();
        }
        header.count.set(count - 1);
        trace!("release {} -> {}", header.type_name, count - 1);

        if count == 1 {
            debug!("destroying {}", header.type_name);
            let destroy = header.destroy;
            destroy(block);
        }
    }
}

unsafe fn destroy_allocation<T>(block: NonNull<ControlBlock>) {
    let mut allocation = Box::from_raw(block.cast::<Allocation<T>>().as_ptr());
    ManuallyDrop::drop(&mut allocation.resource);
}

/// Address of the resource inside the allocation that starts at `block`.
///
/// # Safety
///
/// The allocation must have been created for a resource of type `U`.
unsafe fn resource_ptr<U>(block: NonNull<ControlBlock>) -> NonNull<U> {
    let allocation = block.cast::<Allocation<U>>().as_ptr();
    NonNull::new_unchecked(ptr::addr_of_mut!((*allocation).resource).cast::<U>())
}

// =============================================================================
// Handle
// =============================================================================

/// A shared, reference-counted handle to a heap resource.
///
/// See the [module documentation](self) for the ownership rules.
pub struct SharedPtr<T: ?Sized> {
    // The view and the block are either both present or both absent.
    parts: Option<(NonNull<T>, NonNull<ControlBlock>)>,
    _marker: PhantomData<T>,
}

impl<T: Any> SharedPtr<T> {
    /// Moves `value` to the heap and returns its first owner.
    pub fn new(value: T) -> Self {
        let allocation = Box::new(Allocation {
            block: ControlBlock {
                count: Cell::new(1),
                type_id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
                destroy: destroy_allocation::<T>,
            },
            resource: ManuallyDrop::new(value),
        });
        trace!("allocate {}", type_name::<T>());

        let raw = Box::into_raw(allocation);
        unsafe {
            let block = NonNull::new_unchecked(raw.cast::<ControlBlock>());
            Self::from_parts(resource_ptr::<T>(block), block)
        }
    }

    /// Returns the resource by value if `this` is its only owner.
    ///
    /// The handle comes back unchanged in `Err` when it is empty, when other
    /// owners exist, or when it views something other than the whole
    /// resource.
    pub fn try_unwrap(this: Self) -> Result<T, Self> {
        let Some((view, block)) = this.parts else {
            return Err(this);
        };

        let header = unsafe { block.as_ref() };
        let whole = header.type_id == TypeId::of::<T>()
            && unsafe { resource_ptr::<T>(block) } == view;
        if !whole || header.count.get() != 1 {
            return Err(this);
        }

        mem::forget(this);
        unsafe {
            let mut allocation = Box::from_raw(block.cast::<Allocation<T>>().as_ptr());
            allocation.block.count.set(0);
            Ok(ManuallyDrop::take(&mut allocation.resource))
        }
    }
}

// Everything below takes the handle as `this` rather than `self`, so a
// method of the same name on the resource stays reachable through `Deref`.
impl<T: ?Sized> SharedPtr<T> {
    /// A handle that owns nothing.
    pub const fn empty() -> Self {
        SharedPtr {
            parts: None,
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// The caller hands over one share of `block`, and `view` must stay valid
    /// for as long as that share is held.
    unsafe fn from_parts(view: NonNull<T>, block: NonNull<ControlBlock>) -> Self {
        SharedPtr {
            parts: Some((view, block)),
            _marker: PhantomData,
        }
    }

    fn header(&self) -> Option<&ControlBlock> {
        self.parts.map(|(_, block)| unsafe { &*block.as_ptr() })
    }

    fn block_addr(&self) -> Option<NonNull<ControlBlock>> {
        self.parts.map(|(_, block)| block)
    }

    /// Number of handles sharing the resource, 0 for an empty handle.
    pub fn use_count(this: &Self) -> usize {
        this.header().map_or(0, |header| header.count.get())
    }

    pub fn is_empty(this: &Self) -> bool {
        this.parts.is_none()
    }

    pub fn is_owning(this: &Self) -> bool {
        this.parts.is_some()
    }

    /// Borrows the resource without taking a share.
    pub fn get(this: &Self) -> Option<&T> {
        this.parts.map(|(view, _)| unsafe { &*view.as_ptr() })
    }

    /// The raw view pointer, `None` for an empty handle.
    pub fn as_ptr(this: &Self) -> Option<*const T> {
        this.parts.map(|(view, _)| view.as_ptr() as *const T)
    }

    /// `true` when both handles share a control block, or both are empty.
    pub fn ptr_eq<U: ?Sized>(this: &Self, other: &SharedPtr<U>) -> bool {
        this.block_addr() == other.block_addr()
    }

    /// Moves ownership out, leaving `this` empty.
    pub fn take(this: &mut Self) -> SharedPtr<T> {
        mem::take(this)
    }

    /// Gives up this handle's share and leaves it empty.
    pub fn reset(this: &mut Self) {
        drop(SharedPtr::take(this));
    }

    /// Type name of the resource as it was constructed.
    pub fn type_name(this: &Self) -> Option<&'static str> {
        this.header().map(|header| header.type_name)
    }

    /// Whether the resource was constructed as a `U`.
    pub fn is<U: Any>(this: &Self) -> bool {
        this.header()
            .is_some_and(|header| header.type_id == TypeId::of::<U>())
    }

    /// Checked downcast to the resource's concrete type.
    ///
    /// On success the new handle shares the control block, so the count grows
    /// by one. An empty handle downcasts to an empty handle.
    pub fn downcast<U: Any>(this: &Self) -> Result<SharedPtr<U>, CastError> {
        let Some((_, block)) = this.parts else {
            return Ok(SharedPtr::empty());
        };

        let header = unsafe { block.as_ref() };
        if header.type_id != TypeId::of::<U>() {
            return Err(CastError::type_mismatch(type_name::<U>(), header.type_name));
        }

        header.acquire();
        Ok(unsafe { SharedPtr::from_parts(resource_ptr::<U>(block), block) })
    }

    /// Shares the resource under a view the compiler can verify.
    ///
    /// `view` receives the current target and returns a reference borrowed
    /// from it, typically an unsizing coercion:
    ///
    /// ```
    /// use design_patterns::SharedPtr;
    /// use std::fmt::Display;
    ///
    /// let name = SharedPtr::new(String::from("leaf"));
    /// let shown: SharedPtr<dyn Display> = SharedPtr::upcast::<dyn Display>(&name, |s| s);
    /// assert_eq!(shown.to_string(), "leaf");
    /// assert_eq!(SharedPtr::use_count(&name), 2);
    /// ```
    pub fn upcast<U: ?Sized>(this: &Self, view: impl FnOnce(&T) -> &U) -> SharedPtr<U> {
        let Some((current, block)) = this.parts else {
            return SharedPtr::empty();
        };

        let target = NonNull::from(view(unsafe { &*current.as_ptr() }));
        unsafe {
            block.as_ref().acquire();
            SharedPtr::from_parts(target, block)
        }
    }

    /// Shares the resource reinterpreted as `U`, with no runtime check.
    ///
    /// # Safety
    ///
    /// The current view must point at a valid `U` for the lifetime of the
    /// resource.
    pub unsafe fn static_view<U>(this: &Self) -> SharedPtr<U> {
        let Some((current, block)) = this.parts else {
            return SharedPtr::empty();
        };

        block.as_ref().acquire();
        SharedPtr::from_parts(current.cast::<U>(), block)
    }
}

impl<T: ?Sized> Drop for SharedPtr<T> {
    fn drop(&mut self) {
        if let Some((_, block)) = self.parts.take() {
            unsafe { ControlBlock::release(block) }
        }
    }
}

impl<T: ?Sized> Clone for SharedPtr<T> {
    fn clone(&self) -> Self {
        if let Some(header) = self.header() {
            header.acquire();
        }
        SharedPtr {
            parts: self.parts,
            _marker: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        let same = match (self.parts, source.parts) {
            (Some((a, x)), Some((b, y))) => x == y && a.cast::<()>() == b.cast::<()>(),
            (None, None) => true,
            _ => false,
        };
        if !same {
            *self = source.clone();
        }
    }
}

impl<T: ?Sized> Default for SharedPtr<T> {
    fn default() -> Self {
        SharedPtr::empty()
    }
}

impl<T: Any> From<Option<T>> for SharedPtr<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(SharedPtr::empty, SharedPtr::new)
    }
}

impl<T: ?Sized> Deref for SharedPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match SharedPtr::get(self) {
            Some(value) => value,
            None => panic!(
                "null access: dereferenced an empty SharedPtr<{}>",
                type_name::<T>()
            ),
        }
    }
}

impl<T: ?Sized, U: ?Sized> PartialEq<SharedPtr<U>> for SharedPtr<T> {
    fn eq(&self, other: &SharedPtr<U>) -> bool {
        SharedPtr::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Eq for SharedPtr<T> {}

impl<T: ?Sized> Hash for SharedPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.block_addr().hash(state);
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SharedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match SharedPtr::get(self) {
            Some(value) => f
                .debug_struct("SharedPtr")
                .field("use_count", &SharedPtr::use_count(self))
                .field("value", &value)
                .finish(),
            None => f.write_str("SharedPtr(empty)"),
        }
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for SharedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match SharedPtr::get(self) {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("<empty>"),
        }
    }
}

impl<T: ?Sized> fmt::Pointer for SharedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts {
            Some((view, _)) => fmt::Pointer::fmt(&view, f),
            None => fmt::Pointer::fmt(&ptr::null::<u8>(), f),
        }
    }
}
