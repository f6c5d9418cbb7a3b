//! End-to-end flows: render a modal dialog, hit-test mouse input against
//! the frame, and drive open/close through the listener registry.

use std::cell::Cell;
use std::rc::Rc;

use scrim_core::event::{Event, KeyCode, MouseButton, MouseEvent, MouseEventKind};
use scrim_core::geometry::Rect;
use scrim_core::registry::ListenerRegistry;
use scrim_core::target::EventTarget;
use scrim_style::StyleSheet;
use scrim_widgets::modal::{
    DIALOG_HIT_BUTTON, Dialog, DialogConfig, DialogResult, DialogState, MODAL_HIT_BACKDROP,
    Modal, ModalConfig, ModalSizeConstraints, ModalState, ModalWiring,
};
use scrim_widgets::{FocusManager, Frame, HitId, HitRegion};

const SCREEN: Rect = Rect::new(0, 0, 60, 20);

fn confirm_modal() -> Modal<Dialog> {
    Modal::new(Dialog::confirm("Delete file?", "This cannot be undone.").hit_id(HitId::new(2)))
        .size(
            ModalSizeConstraints::new()
                .min_width(30)
                .max_width(40)
                .min_height(7)
                .max_height(9),
        )
        .hit_id(HitId::new(1))
}

#[test]
fn backdrop_click_closes_via_hit_test() {
    let modal = confirm_modal();
    let mut dialog_state = DialogState::new();
    let mut frame = Frame::with_hit_grid(SCREEN.width, SCREEN.height);
    modal.render_stateful(SCREEN, &mut frame, &mut dialog_state);

    // Top-left corner is outside the centered dialog: backdrop.
    let hit = frame.hit_test(0, 0);
    assert_eq!(hit.map(|h| h.1), Some(MODAL_HIT_BACKDROP));

    let mut modal_state = ModalState::default();
    let config = ModalConfig::default().hit_id(HitId::new(1));
    let click = Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 0, 0));
    let action = modal_state.handle_event(&click, hit, &config);
    assert!(action.is_some());
    assert!(!modal_state.is_open());
}

#[test]
fn button_click_closes_dialog_with_result() {
    let dialog = Dialog::confirm("Delete file?", "This cannot be undone.").hit_id(HitId::new(2));
    let modal = confirm_modal();
    let mut state = DialogState::new();
    let mut frame = Frame::with_hit_grid(SCREEN.width, SCREEN.height);
    modal.render_stateful(SCREEN, &mut frame, &mut state);

    // Find the cancel button (hit data 1) in the rendered frame.
    let mut cancel_at = None;
    for y in 0..SCREEN.height {
        for x in 0..SCREEN.width {
            if let Some((id, region, data)) = frame.hit_test(x, y)
                && id == HitId::new(2)
                && region == DIALOG_HIT_BUTTON
                && data == 1
            {
                cancel_at = Some((x, y));
            }
        }
    }
    let (x, y) = cancel_at.expect("cancel button rendered with a hit region");

    let click = Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x, y));
    let result = dialog.handle_event(&click, frame.hit_test(x, y), &mut state);
    assert_eq!(result, Some(DialogResult::Cancel));
    assert!(!state.is_open());
}

#[test]
fn wiring_escape_flow_with_focus_restore() {
    let input = EventTarget::new();
    let mut wiring = ModalWiring::new(&input, ModalConfig::default());
    let mut focus = FocusManager::new();
    for id in [100, 1, 2] {
        focus.insert(id);
    }
    focus.focus(100);

    // Open: trap focus on the dialog's buttons.
    wiring.open();
    focus.push_trap(vec![1, 2]);
    assert_eq!(focus.current(), Some(1), "auto-focus first button");

    // Escape arrives on the input target.
    input.emit("key", &Event::key(KeyCode::Escape));
    assert!(!wiring.is_open());

    // Host notices the close, pops the trap, and disconnects.
    focus.pop_trap();
    wiring.disconnect();
    assert_eq!(focus.current(), Some(100), "focus restored to opener");
    assert!(!wiring.is_connected());

    // Further input is inert.
    wiring.state().borrow_mut().open();
    input.emit("key", &Event::key(KeyCode::Escape));
    assert!(wiring.is_open());
}

#[test]
fn registry_scenarios_through_widget_targets() {
    let mut registry = ListenerRegistry::new();
    let btn = EventTarget::new();

    let f1 = Rc::new(Cell::new(0));
    let f2 = Rc::new(Cell::new(0));
    let c1 = Rc::clone(&f1);
    let c2 = Rc::clone(&f2);
    registry.attach("click.a", &btn.handle(), move |_| c1.set(c1.get() + 1));
    registry.attach("click.b", &btn.handle(), move |_| c2.set(c2.get() + 1));
    registry.detach("click.a", &[&btn.handle()]);

    btn.emit(
        "click",
        &Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 0, 0)),
    );
    assert_eq!((f1.get(), f2.get()), (0, 1));

    registry.detach_all(&[&btn.handle()]);
    assert!(!registry.has_listeners(&btn.handle()));
}

#[test]
fn stylesheet_drives_dialog_config() {
    let sheet = StyleSheet::parse(
        "dialog { bg: #1e1e2e; }\n\
         dialog.title { fg: bright-white; }\n\
         button.focused { bg: blue; fg: bright-white; }",
    )
    .unwrap();
    let config = DialogConfig::from_sheet(&sheet);
    let dialog = Dialog::alert("Saved", "All changes written.").config(config);

    let mut state = DialogState::new();
    let mut frame = Frame::new(SCREEN.width, SCREEN.height);
    Modal::new(dialog)
        .size(ModalSizeConstraints::new().max_width(30).max_height(7))
        .render_stateful(SCREEN, &mut frame, &mut state);

    // The dialog surface picked up the sheet's background.
    let content = sheet.get("dialog").unwrap();
    let center = frame.buffer.get(30, 10).unwrap();
    assert_eq!(Some(center.bg), content.bg);
}

#[test]
fn modal_hit_region_enum_is_stable() {
    // Backdrop and content tags must stay distinct for routing.
    assert_ne!(MODAL_HIT_BACKDROP, HitRegion::Custom(2));
    assert_ne!(MODAL_HIT_BACKDROP, DIALOG_HIT_BUTTON);
}
