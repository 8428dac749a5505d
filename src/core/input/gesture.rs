//=========================================================================
// Gesture Records
//=========================================================================
//
// Read access to one multi-touch notification.
//
// Architecture:
//   Platform record → MotionSource (index-based accessors) → TouchTranslator
//
// Accessors are fallible: asking for a pointer index the notification does
// not carry is reported as `PointerIndexError`, mirroring the platform's
// illegal-argument condition.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::event::{Pointer, PointerId, TouchAction};

//=== PointerIndexError ===================================================

/// A pointer index outside the notification's pointer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pointer index {index} out of range ({count} pointers)")]
pub struct PointerIndexError {
    pub index: usize,
    pub count: usize,
}

//=== MotionSource ========================================================

/// Index-based view of a multi-touch notification.
///
/// Index 0 is the primary pointer. Implementations must report every
/// concurrently active pointer on every notification.
pub trait MotionSource {
    fn action(&self) -> TouchAction;

    fn pointer_count(&self) -> usize;

    fn pointer(&self, index: usize) -> Result<Pointer, PointerIndexError>;

    fn pointer_id(&self, index: usize) -> Result<PointerId, PointerIndexError> {
        self.pointer(index).map(|p| p.id)
    }
}

//=== TouchGesture ========================================================

/// Owned gesture notification.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchGesture {
    action: TouchAction,
    pointers: Vec<Pointer>,
}

impl TouchGesture {
    pub fn new(action: TouchAction, pointers: Vec<Pointer>) -> Self {
        Self { action, pointers }
    }

    /// Builds a gesture from a raw Android action code.
    pub fn from_raw(raw_action: i32, pointers: Vec<Pointer>) -> Self {
        Self::new(TouchAction::from_raw(raw_action), pointers)
    }

    pub fn pointers(&self) -> &[Pointer] {
        &self.pointers
    }
}

impl MotionSource for TouchGesture {
    fn action(&self) -> TouchAction {
        self.action
    }

    fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    fn pointer(&self, index: usize) -> Result<Pointer, PointerIndexError> {
        self.pointers.get(index).copied().ok_or(PointerIndexError {
            index,
            count: self.pointers.len(),
        })
    }
}

//=========================================================================
// Tests
//=========================================================================
