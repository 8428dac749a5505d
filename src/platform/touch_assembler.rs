//=========================================================================
// Touch Assembler
//
// Rebuilds full multi-touch notifications from Winit's per-contact
// touch events.
//
// Winit reports one contact per event; the translator expects every
// active pointer on every notification, with Android-style actions.
//
// Mapping:
// ```text
//   Started    first contact   → Down
//              further contact → PointerDown(index)
//   Moved                      → Move
//   Ended      last contact    → Up
//              other contact   → PointerUp(index)   (still listed, then dropped)
//   Cancelled                  → Cancel             (all contacts dropped)
// ```
//
// Notes:
// Contacts keep the order they went down in, so a pointer's index is
// stable until an earlier pointer lifts.
//=========================================================================

//=== External Dependencies ===============================================

use log::{trace, warn};
use winit::event::TouchPhase;

//=== Internal Dependencies ===============================================

use crate::core::input::{Pointer, TouchAction, TouchGesture};

//=== TouchAssembler ======================================================

pub(crate) struct TouchAssembler {
    active: Vec<Pointer>,
}

impl TouchAssembler {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        const POINTER_BASE: usize = 10;

        Self {
            active: Vec::with_capacity(POINTER_BASE),
        }
    }

    //--- Event Handling ---------------------------------------------------

    /// Folds one contact event into a full gesture.
    ///
    /// Returns `None` for events that carry no gesture (unknown contacts,
    /// ids outside the engine's range).
    pub fn process(&mut self, phase: TouchPhase, id: u64, x: f64, y: f64) -> Option<TouchGesture> {
        let Ok(raw_id) = i32::try_from(id) else {
            warn!(target: "platform::input", "Touch id {} out of range, dropped", id);
            return None;
        };
        let pointer = Pointer::new(raw_id, x as f32, y as f32);

        match phase {
            TouchPhase::Started => {
                if self.index_of(raw_id).is_some() {
                    trace!(target: "platform::input", "Touch {} started twice", raw_id);
                    return self.moved(pointer);
                }
                self.active.push(pointer);
                let action = match self.active.len() {
                    1 => TouchAction::Down,
                    n => TouchAction::PointerDown(n - 1),
                };
                Some(self.gesture(action))
            }

            TouchPhase::Moved => self.moved(pointer),

            TouchPhase::Ended => {
                let index = self.index_of(raw_id)?;
                self.active[index] = pointer;
                let action = match self.active.len() {
                    1 => TouchAction::Up,
                    _ => TouchAction::PointerUp(index),
                };
                let gesture = self.gesture(action);
                self.active.remove(index);
                Some(gesture)
            }

            TouchPhase::Cancelled => {
                if let Some(index) = self.index_of(raw_id) {
                    self.active[index] = pointer;
                }
                let gesture = self.gesture(TouchAction::Cancel);
                self.active.clear();
                Some(gesture)
            }
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn moved(&mut self, pointer: Pointer) -> Option<TouchGesture> {
        let index = self.index_of(pointer.id.0)?;
        self.active[index] = pointer;
        Some(self.gesture(TouchAction::Move))
    }

    fn index_of(&self, raw_id: i32) -> Option<usize> {
        self.active.iter().position(|p| p.id.0 == raw_id)
    }

    fn gesture(&self, action: TouchAction) -> TouchGesture {
        TouchGesture::new(action, self.active.clone())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MotionSource;

    fn ids(gesture: &TouchGesture) -> Vec<i32> {
        gesture.pointers().iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn single_tap() {
        let mut assembler = TouchAssembler::new();

        let down = assembler.process(TouchPhase::Started, 0, 10.0, 20.0).unwrap();
        let up = assembler.process(TouchPhase::Ended, 0, 11.0, 21.0).unwrap();

        assert_eq!(down.action(), TouchAction::Down);
        assert_eq!(up.action(), TouchAction::Up);
        assert_eq!(up.pointers()[0], Pointer::new(0, 11.0, 21.0));
        assert_eq!(assembler.active_count(), 0);
    }

    #[test]
    fn second_finger_is_pointer_down() {
        let mut assembler = TouchAssembler::new();

        assembler.process(TouchPhase::Started, 3, 0.0, 0.0);
        let second = assembler.process(TouchPhase::Started, 7, 5.0, 5.0).unwrap();

        assert_eq!(second.action(), TouchAction::PointerDown(1));
        assert_eq!(ids(&second), vec![3, 7]);
    }

    #[test]
    fn lifting_one_of_two_lists_it_once_more() {
        let mut assembler = TouchAssembler::new();
        assembler.process(TouchPhase::Started, 3, 0.0, 0.0);
        assembler.process(TouchPhase::Started, 7, 5.0, 5.0);

        let lift = assembler.process(TouchPhase::Ended, 3, 1.0, 1.0).unwrap();
        assert_eq!(lift.action(), TouchAction::PointerUp(0));
        assert_eq!(ids(&lift), vec![3, 7]);

        let moved = assembler.process(TouchPhase::Moved, 7, 6.0, 6.0).unwrap();
        assert_eq!(moved.action(), TouchAction::Move);
        assert_eq!(ids(&moved), vec![7]);
    }

    #[test]
    fn cancel_drops_every_contact() {
        let mut assembler = TouchAssembler::new();
        assembler.process(TouchPhase::Started, 1, 0.0, 0.0);
        assembler.process(TouchPhase::Started, 2, 0.0, 0.0);

        let cancel = assembler.process(TouchPhase::Cancelled, 2, 0.0, 0.0).unwrap();

        assert_eq!(cancel.action(), TouchAction::Cancel);
        assert_eq!(cancel.pointer_count(), 2);
        assert_eq!(assembler.active_count(), 0);
    }

    #[test]
    fn unknown_contacts_are_ignored() {
        let mut assembler = TouchAssembler::new();

        assert!(assembler.process(TouchPhase::Moved, 9, 0.0, 0.0).is_none());
        assert!(assembler.process(TouchPhase::Ended, 9, 0.0, 0.0).is_none());
        assert!(assembler.process(TouchPhase::Started, u64::MAX, 0.0, 0.0).is_none());
    }
}
