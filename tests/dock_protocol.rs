//! Docking negotiation against scripted and in-process shells.

mod common;

use common::{Call, RecordingSurface, ScriptedShell};
use crossbeam_channel::unbounded;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tickertape::{
    BarId, DockController, DockEdge, DockError, DockShell, DockState, Rect, ShellNotification,
    WorkAreaShell,
};

const BAR: BarId = BarId(42);
const FLOATING: Rect = Rect::new(0, 10, 80, 1);

fn controller() -> DockController {
    let (tx, _rx) = unbounded();
    DockController::new(BAR, tx, 1)
}

#[test]
fn query_failure_rolls_back_with_one_remove() {
    let dock = controller();
    let mut shell = ScriptedShell::new(80, 24);
    shell.fail_query = true;
    let mut surface = RecordingSurface::new(FLOATING);

    let err = dock.dock(DockEdge::Top, &mut shell, &mut surface).unwrap_err();

    assert_eq!(err, DockError::QueryFailed);
    assert_eq!(dock.state(), DockState::Undocked);
    assert_eq!(shell.registers(), 1);
    assert_eq!(shell.removes(), 1);
    assert_eq!(surface.bounds, FLOATING);
    assert!(surface.layered_at_set_bounds.is_empty());
}

#[test]
fn register_failure_leaves_nothing_to_remove() {
    let dock = controller();
    let mut shell = ScriptedShell::new(80, 24);
    shell.fail_register = true;
    let mut surface = RecordingSurface::new(FLOATING);

    assert_eq!(
        dock.dock(DockEdge::Bottom, &mut shell, &mut surface),
        Err(DockError::RegisterFailed)
    );
    assert_eq!(dock.state(), DockState::Undocked);
    assert_eq!(shell.calls, vec![Call::Register(BAR)]);
}

#[test]
fn set_pos_failure_rolls_back() {
    let dock = controller();
    let mut shell = ScriptedShell::new(80, 24);
    shell.fail_set_pos = true;
    let mut surface = RecordingSurface::new(FLOATING);

    assert_eq!(
        dock.dock(DockEdge::Bottom, &mut shell, &mut surface),
        Err(DockError::SetPosFailed)
    );
    assert_eq!(dock.state(), DockState::Undocked);
    assert_eq!(shell.removes(), 1);
    assert_eq!(surface.bounds, FLOATING);
}

#[test]
fn rejected_bounds_roll_back_and_restore_layering() {
    let dock = controller();
    let mut shell = ScriptedShell::new(80, 24);
    let mut surface = RecordingSurface::new(FLOATING);
    surface.reject_bounds = true;

    assert_eq!(
        dock.dock(DockEdge::Top, &mut shell, &mut surface),
        Err(DockError::BoundsRejected)
    );
    assert_eq!(dock.state(), DockState::Undocked);
    assert_eq!(shell.removes(), 1);
    assert!(surface.layered);
}

#[test]
fn layering_is_off_only_during_reposition() {
    let dock = controller();
    let mut shell = ScriptedShell::new(80, 24);
    let mut surface = RecordingSurface::new(FLOATING);

    let rect = dock.dock(DockEdge::Bottom, &mut shell, &mut surface).unwrap();

    assert_eq!(rect, Rect::new(0, 23, 80, 1));
    assert_eq!(surface.layered_at_set_bounds, vec![false]);
    assert!(surface.layered);
    assert_eq!(
        shell.calls,
        vec![
            Call::Register(BAR),
            Call::Query(BAR, DockEdge::Bottom),
            Call::SetPos(BAR, DockEdge::Bottom, Rect::new(0, 23, 80, 1)),
        ]
    );
}

#[test]
fn switching_edges_is_undock_then_dock() {
    let direct = controller();
    let mut direct_shell = ScriptedShell::new(80, 24);
    let mut direct_surface = RecordingSurface::new(FLOATING);
    direct.dock(DockEdge::Top, &mut direct_shell, &mut direct_surface).unwrap();
    direct.dock(DockEdge::Bottom, &mut direct_shell, &mut direct_surface).unwrap();

    let stepwise = controller();
    let mut step_shell = ScriptedShell::new(80, 24);
    let mut step_surface = RecordingSurface::new(FLOATING);
    stepwise.dock(DockEdge::Top, &mut step_shell, &mut step_surface).unwrap();
    stepwise.undock(&mut step_shell, &mut step_surface).unwrap();
    stepwise.dock(DockEdge::Bottom, &mut step_shell, &mut step_surface).unwrap();

    assert_eq!(direct.state(), DockState::DockedBottom);
    assert_eq!(direct.state(), stepwise.state());
    assert_eq!(direct_surface.bounds, step_surface.bounds);
    assert_eq!(direct_shell.calls, step_shell.calls);
    assert_eq!(direct_shell.removes(), 1);
}

#[test]
fn undock_restores_full_width_strip_at_previous_origin() {
    let dock = controller();
    dock.set_strip_height(2);
    let mut shell = ScriptedShell::new(80, 24);
    let mut surface = RecordingSurface::new(Rect::new(5, 7, 30, 2));

    dock.dock(DockEdge::Top, &mut shell, &mut surface).unwrap();
    assert_eq!(surface.bounds, Rect::new(0, 0, 80, 2));

    let rect = dock.undock(&mut shell, &mut surface).unwrap();
    assert_eq!(rect, Rect::new(0, 7, 80, 2));
    assert_eq!(dock.state(), DockState::Undocked);
    assert_eq!(shell.calls.last(), Some(&Call::Remove(BAR)));
}

#[test]
fn reentrant_request_is_rejected_as_busy() {
    let dock = Arc::new(controller());
    let mut shell = ScriptedShell::new(80, 24);
    let mut surface = RecordingSurface::new(FLOATING);

    let inner_result = Rc::new(RefCell::new(None));
    let inner_calls = Rc::new(RefCell::new(0usize));
    {
        let dock = dock.clone();
        let inner_result = inner_result.clone();
        let inner_calls = inner_calls.clone();
        surface.on_set_bounds = Some(Box::new(move |_| {
            let mut inner_shell = ScriptedShell::new(80, 24);
            let mut inner_surface = RecordingSurface::new(FLOATING);
            let result = dock.dock(DockEdge::Bottom, &mut inner_shell, &mut inner_surface);
            *inner_calls.borrow_mut() = inner_shell.calls.len();
            *inner_result.borrow_mut() = Some(result);
        }));
    }

    let outer = dock.dock(DockEdge::Top, &mut shell, &mut surface);

    assert_eq!(outer, Ok(Rect::new(0, 0, 80, 1)));
    assert_eq!(*inner_result.borrow(), Some(Err(DockError::Busy)));
    assert_eq!(*inner_calls.borrow(), 0);
    assert_eq!(dock.state(), DockState::DockedTop);
    assert!(!dock.is_busy());
}

#[test]
fn work_area_shell_notifies_other_docked_bars() {
    let mut shell = WorkAreaShell::new(80, 24);
    let (tx1, rx1) = unbounded();
    let (tx2, rx2) = unbounded();
    let first = DockController::new(BarId(1), tx1, 1);
    let second = DockController::new(BarId(2), tx2, 1);
    let mut surface1 = RecordingSurface::new(FLOATING);
    let mut surface2 = RecordingSurface::new(FLOATING);

    first.dock(DockEdge::Top, &mut shell, &mut surface1).unwrap();
    let rect = second.dock(DockEdge::Top, &mut shell, &mut surface2).unwrap();

    // The second strip stacks below the first.
    assert_eq!(rect, Rect::new(0, 1, 80, 1));
    assert_eq!(shell.work_area(), Rect::new(0, 2, 80, 22));
    assert_eq!(rx1.try_recv(), Ok(ShellNotification::PositionChanged(BarId(1))));
    assert!(rx2.try_recv().is_err());

    // Releasing the first one tells the second.
    first.undock(&mut shell, &mut surface1).unwrap();
    assert_eq!(rx2.try_recv(), Ok(ShellNotification::PositionChanged(BarId(2))));
}
