//=========================================================================
// Touch Translator
//=========================================================================
//
// Converts multi-touch gesture notifications into the engine's fixed
// per-pointer motion stream.
//
// Protocol per notification:
// ```text
//   clear motion (CLEAR, MOVE, released)
//        ↓
//   classify action ──► Down         : cursor, button pressed, DOWN × all
//                   ├─► Up / Cancel  : cursor, button released, UP sentinel
//                   ├─► PointerDown  : cursor, DOWN × all
//                   ├─► PointerUp    : cursor, UP × remaining, MOVE leaving
//                   ├─► Move         : cursor, MOVE × all
//                   └─► other        : nothing
//        ↓
//   end-of-batch motion (END_OF_BATCH, MOVE, released)
// ```
//
// The translator keeps no pointer table between calls. Correctness relies
// on the platform reporting the full pointer list on every notification.
// A pointer index outside that list abandons the rest of the notification;
// the end-of-batch motion is still sent.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::event::{EngineKey, Motion, MotionKind, TouchAction};
use super::gesture::{MotionSource, PointerIndexError};
use crate::core::native::NativeSink;

//=== TouchResponse =======================================================

/// Outcome of one translated notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchResponse {
    /// Whether the notification was consumed. When `false` the platform
    /// may apply its own handling.
    pub handled: bool,
}

//=== TouchTranslator =====================================================

#[derive(Debug)]
pub struct TouchTranslator {
    primary_button: EngineKey,
    abandoned: u64,
}

impl TouchTranslator {
    //--- Construction -----------------------------------------------------

    /// Creates a translator reporting the primary pointer as the left button.
    pub fn new() -> Self {
        Self::with_primary_button(EngineKey::LBUTTON)
    }

    pub fn with_primary_button(primary_button: EngineKey) -> Self {
        Self {
            primary_button,
            abandoned: 0,
        }
    }

    /// Number of notifications cut short by an out-of-range pointer index.
    pub fn abandoned_gestures(&self) -> u64 {
        self.abandoned
    }

    //--- Translation ------------------------------------------------------

    /// Translates one notification into native calls.
    pub fn translate<M, S>(&mut self, gesture: &M, sink: &mut S) -> TouchResponse
    where
        M: MotionSource + ?Sized,
        S: NativeSink + ?Sized,
    {
        sink.send_motion(Motion::clear());

        let action = gesture.action();
        trace!(
            target: "bridge::input",
            "Touch {:?} with {} pointers",
            action,
            gesture.pointer_count()
        );

        if let Err(e) = self.emit(action, gesture, sink) {
            self.abandoned += 1;
            debug!(target: "bridge::input", "Abandoned {:?}: {}", action, e);
        }

        sink.send_motion(Motion::end_of_batch());

        TouchResponse {
            handled: Self::consumes(action),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn emit<M, S>(&self, action: TouchAction, gesture: &M, sink: &mut S) -> Result<(), PointerIndexError>
    where
        M: MotionSource + ?Sized,
        S: NativeSink + ?Sized,
    {
        match action {
            TouchAction::Down => {
                Self::move_cursor(gesture, sink)?;
                sink.send_key(self.primary_button, true);
                Self::emit_all(gesture, sink, true, MotionKind::Down)?;
            }

            TouchAction::Up | TouchAction::Cancel => {
                Self::move_cursor(gesture, sink)?;
                sink.send_key(self.primary_button, false);
                sink.send_motion(Motion::all_released());
            }

            TouchAction::PointerDown(_) => {
                Self::move_cursor(gesture, sink)?;
                Self::emit_all(gesture, sink, true, MotionKind::Down)?;
            }

            TouchAction::PointerUp(index) => {
                let leaving = gesture.pointer(index)?;
                Self::move_cursor(gesture, sink)?;

                for i in 0..gesture.pointer_count() {
                    let pointer = gesture.pointer(i)?;
                    if pointer.id != leaving.id {
                        sink.send_motion(Motion::for_pointer(&pointer, false, MotionKind::Up));
                    }
                }

                sink.send_motion(Motion::for_pointer(&leaving, false, MotionKind::Move));
            }

            TouchAction::Move => {
                Self::move_cursor(gesture, sink)?;
                Self::emit_all(gesture, sink, true, MotionKind::Move)?;
            }

            TouchAction::Outside | TouchAction::Other(_) => {}
        }

        Ok(())
    }

    /// Moves the engine cursor to the primary pointer.
    fn move_cursor<M, S>(gesture: &M, sink: &mut S) -> Result<(), PointerIndexError>
    where
        M: MotionSource + ?Sized,
        S: NativeSink + ?Sized,
    {
        let (x, y) = gesture.pointer(0)?.pixel();
        sink.move_mouse(x, y);
        Ok(())
    }

    fn emit_all<M, S>(
        gesture: &M,
        sink: &mut S,
        pressed: bool,
        kind: MotionKind,
    ) -> Result<(), PointerIndexError>
    where
        M: MotionSource + ?Sized,
        S: NativeSink + ?Sized,
    {
        for i in 0..gesture.pointer_count() {
            let pointer = gesture.pointer(i)?;
            sink.send_motion(Motion::for_pointer(&pointer, pressed, kind));
        }
        Ok(())
    }

    fn consumes(action: TouchAction) -> bool {
        !matches!(action, TouchAction::Outside | TouchAction::Other(_))
    }
}

impl Default for TouchTranslator {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{Pointer, PointerId};
    use crate::core::input::gesture::TouchGesture;
    use crate::core::native::{NativeCall, RecordingSink};

    fn gesture(action: TouchAction, pointers: &[(i32, f32, f32)]) -> TouchGesture {
        TouchGesture::new(
            action,
            pointers.iter().map(|&(id, x, y)| Pointer::new(id, x, y)).collect(),
        )
    }

    fn motion(id: i32, x: i32, y: i32, pressed: bool, kind: MotionKind) -> NativeCall {
        NativeCall::Motion(Motion {
            pointer: PointerId(id),
            x,
            y,
            pressed,
            kind,
        })
    }

    /// Reports more pointers than it can return.
    struct TruncatedGesture {
        action: TouchAction,
        reported: usize,
        available: Vec<Pointer>,
    }

    impl MotionSource for TruncatedGesture {
        fn action(&self) -> TouchAction {
            self.action
        }

        fn pointer_count(&self) -> usize {
            self.reported
        }

        fn pointer(&self, index: usize) -> Result<Pointer, PointerIndexError> {
            self.available.get(index).copied().ok_or(PointerIndexError {
                index,
                count: self.available.len(),
            })
        }
    }

    //=====================================================================
    // Single Pointer
    //=====================================================================

    #[test]
    fn single_pointer_down_then_up() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        let down = translator.translate(&gesture(TouchAction::Down, &[(0, 10.0, 20.0)]), &mut sink);
        assert!(down.handled);
        assert_eq!(
            sink.take(),
            vec![
                NativeCall::Motion(Motion::clear()),
                NativeCall::MouseMove { x: 10, y: 20 },
                NativeCall::Key { key: EngineKey::LBUTTON, pressed: true },
                motion(0, 10, 20, true, MotionKind::Down),
                NativeCall::Motion(Motion::end_of_batch()),
            ]
        );

        let up = translator.translate(&gesture(TouchAction::Up, &[(0, 12.0, 22.0)]), &mut sink);
        assert!(up.handled);
        assert_eq!(
            sink.take(),
            vec![
                NativeCall::Motion(Motion::clear()),
                NativeCall::MouseMove { x: 12, y: 22 },
                NativeCall::Key { key: EngineKey::LBUTTON, pressed: false },
                NativeCall::Motion(Motion::all_released()),
                NativeCall::Motion(Motion::end_of_batch()),
            ]
        );
    }

    #[test]
    fn cancel_releases_like_up() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        translator.translate(&gesture(TouchAction::Cancel, &[(0, 1.0, 1.0)]), &mut sink);

        assert!(sink
            .calls()
            .contains(&NativeCall::Key { key: EngineKey::LBUTTON, pressed: false }));
        assert!(sink.motions().contains(&Motion::all_released()));
    }

    #[test]
    fn move_emits_pressed_moves_for_all_pointers() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        translator.translate(
            &gesture(TouchAction::Move, &[(0, 1.0, 2.0), (1, 3.0, 4.0)]),
            &mut sink,
        );

        assert_eq!(
            sink.take(),
            vec![
                NativeCall::Motion(Motion::clear()),
                NativeCall::MouseMove { x: 1, y: 2 },
                motion(0, 1, 2, true, MotionKind::Move),
                motion(1, 3, 4, true, MotionKind::Move),
                NativeCall::Motion(Motion::end_of_batch()),
            ]
        );
    }

    //=====================================================================
    // Multiple Pointers
    //=====================================================================

    #[test]
    fn secondary_down_emits_down_for_every_pointer() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        translator.translate(
            &gesture(TouchAction::PointerDown(1), &[(0, 1.0, 1.0), (1, 5.0, 6.0)]),
            &mut sink,
        );

        assert_eq!(
            sink.motions(),
            vec![
                Motion::clear(),
                Motion { pointer: PointerId(0), x: 1, y: 1, pressed: true, kind: MotionKind::Down },
                Motion { pointer: PointerId(1), x: 5, y: 6, pressed: true, kind: MotionKind::Down },
                Motion::end_of_batch(),
            ]
        );
        // No button state change for secondary pointers
        assert!(!sink.calls().iter().any(|c| matches!(c, NativeCall::Key { .. })));
    }

    #[test]
    fn secondary_up_releases_others_then_moves_leaving_pointer() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        // Pointer B (id 7) lifts while A (id 3) stays down
        translator.translate(
            &gesture(TouchAction::PointerUp(1), &[(3, 10.0, 10.0), (7, 50.0, 60.0)]),
            &mut sink,
        );

        assert_eq!(
            sink.take(),
            vec![
                NativeCall::Motion(Motion::clear()),
                NativeCall::MouseMove { x: 10, y: 10 },
                motion(3, 10, 10, false, MotionKind::Up),
                motion(7, 50, 60, false, MotionKind::Move),
                NativeCall::Motion(Motion::end_of_batch()),
            ]
        );
    }

    #[test]
    fn secondary_up_uses_ids_not_indices() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        // Leaving pointer sits at index 0 but has id 2
        translator.translate(
            &gesture(
                TouchAction::PointerUp(0),
                &[(2, 1.0, 1.0), (0, 2.0, 2.0), (1, 3.0, 3.0)],
            ),
            &mut sink,
        );

        let motions = sink.motions();
        assert_eq!(motions.len(), 5);
        assert_eq!(motions[1].pointer, PointerId(0));
        assert_eq!(motions[2].pointer, PointerId(1));
        assert_eq!(
            motions[3],
            Motion { pointer: PointerId(2), x: 1, y: 1, pressed: false, kind: MotionKind::Move }
        );
    }

    //=====================================================================
    // Range Errors
    //=====================================================================

    #[test]
    fn out_of_range_index_abandons_notification() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        let broken = TruncatedGesture {
            action: TouchAction::Move,
            reported: 3,
            available: vec![Pointer::new(0, 1.0, 1.0)],
        };
        translator.translate(&broken, &mut sink);

        assert_eq!(
            sink.take(),
            vec![
                NativeCall::Motion(Motion::clear()),
                NativeCall::MouseMove { x: 1, y: 1 },
                motion(0, 1, 1, true, MotionKind::Move),
                NativeCall::Motion(Motion::end_of_batch()),
            ]
        );
        assert_eq!(translator.abandoned_gestures(), 1);

        // Next notification is processed normally
        translator.translate(&gesture(TouchAction::Move, &[(0, 2.0, 2.0), (1, 4.0, 4.0)]), &mut sink);
        assert_eq!(sink.motions().len(), 4);
        assert_eq!(translator.abandoned_gestures(), 1);
    }

    #[test]
    fn out_of_range_leaving_index_emits_only_sentinels() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        translator.translate(&gesture(TouchAction::PointerUp(4), &[(0, 1.0, 1.0)]), &mut sink);

        assert_eq!(sink.motions(), vec![Motion::clear(), Motion::end_of_batch()]);
        assert_eq!(sink.calls().len(), 2);
    }

    #[test]
    fn empty_down_is_abandoned() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        translator.translate(&gesture(TouchAction::Down, &[]), &mut sink);

        assert_eq!(sink.calls().len(), 2);
        assert_eq!(translator.abandoned_gestures(), 1);
    }

    //=====================================================================
    // Handled Flag
    //=====================================================================

    #[test]
    fn uninterpreted_actions_are_not_handled() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();

        let outside = translator.translate(&gesture(TouchAction::Outside, &[(0, 1.0, 1.0)]), &mut sink);
        let hover = translator.translate(&gesture(TouchAction::Other(7), &[(0, 1.0, 1.0)]), &mut sink);

        assert!(!outside.handled);
        assert!(!hover.handled);
        // Only sentinels for both
        assert_eq!(sink.calls().len(), 4);
    }

    #[test]
    fn pointer_transitions_are_handled() {
        let mut translator = TouchTranslator::new();
        let mut sink = RecordingSink::new();
        let pointers = [(0, 1.0, 1.0), (1, 2.0, 2.0)];

        assert!(translator.translate(&gesture(TouchAction::PointerDown(1), &pointers), &mut sink).handled);
        assert!(translator.translate(&gesture(TouchAction::PointerUp(1), &pointers), &mut sink).handled);
    }

    #[test]
    fn custom_primary_button() {
        let mut translator = TouchTranslator::with_primary_button(EngineKey(0x02));
        let mut sink = RecordingSink::new();

        translator.translate(&gesture(TouchAction::Down, &[(0, 0.0, 0.0)]), &mut sink);

        assert!(sink.calls().contains(&NativeCall::Key { key: EngineKey(0x02), pressed: true }));
    }
}
