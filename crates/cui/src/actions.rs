use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Dismiss => app.show_help = false,
        InputAction::MoveUp => app.move_cursor(false),
        InputAction::MoveDown => app.move_cursor(true),
        InputAction::Activate => app.activate_primary(),
        InputAction::AddPlayer => app.open_add_player_prompt(),
        InputAction::RemovePlayer => app.remove_selected_player(),
        InputAction::RenamePlayer => app.open_rename_prompt(),
        InputAction::CycleColor => app.cycle_selected_color(),
        InputAction::HandicapUp => app.adjust_selected_handicap(1),
        InputAction::HandicapDown => app.adjust_selected_handicap(-1),
        InputAction::ToggleHandicap => app.toggle_handicap(),
        InputAction::ToggleShotTimer => app.toggle_shot_timer(),
        InputAction::ClockShorter => app.adjust_shot_clock(-5),
        InputAction::ClockLonger => app.adjust_shot_clock(5),
        InputAction::RestartClock => app.restart_clock(),
        InputAction::StartMatch => app.start_match(),
        InputAction::EditLocation => app.open_location_prompt(),
        InputAction::EnterDistance => app.open_distance_prompt(),
        InputAction::HoleOut => app.record_hole_out(),
        InputAction::PickClosest => app.pick_closest(),
        InputAction::ResetChips => app.reset_chips(),
        InputAction::PuttMade => app.record_putt(true),
        InputAction::PuttMissed => app.record_putt(false),
        InputAction::Finalize => app.finalize_step(),
        InputAction::Next => app.next_step(),
        InputAction::Undo => app.undo(),
        InputAction::Redo => app.redo(),
        InputAction::EndMatch => app.end_match(),
        InputAction::SaveState => app.open_save_prompt(),
        InputAction::LoadState => app.open_load_prompt(),
        InputAction::Export => app.open_export_prompt(),
    }
}
