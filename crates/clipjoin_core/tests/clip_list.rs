use std::path::PathBuf;
use std::sync::Once;

use clipjoin_core::{update, AppState, ClipFile, Msg, MoveDirection};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(clipjoin_logging::initialize_for_tests);
}

fn clip_file(name: &str) -> ClipFile {
    ClipFile {
        file_name: name.to_string(),
        path: PathBuf::from(format!("/videos/{name}")),
    }
}

fn pick(state: AppState, names: &[&str]) -> AppState {
    let files = names.iter().map(|name| clip_file(name)).collect();
    let (state, effects) = update(state, Msg::ClipsPicked(files));
    assert!(effects.is_empty());
    state
}

fn row_names(state: &AppState) -> Vec<String> {
    state
        .view()
        .clips
        .iter()
        .map(|row| row.file_name.clone())
        .collect()
}

#[test]
fn picked_clips_keep_input_order_and_get_unique_ids() {
    init_logging();
    let state = pick(AppState::new(), &["a.mp4", "b.mp4", "c.mov"]);
    let view = state.view();

    assert_eq!(row_names(&state), vec!["a.mp4", "b.mp4", "c.mov"]);

    let mut ids: Vec<_> = view.clips.iter().map(|row| row.clip_id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn duplicate_names_are_not_deduplicated() {
    init_logging();
    let state = pick(AppState::new(), &["a.mp4", "a.mp4"]);
    assert_eq!(state.view().clips.len(), 2);
}

#[test]
fn empty_pick_is_noop() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::ClipsPicked(Vec::new()));

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn move_up_and_down_swap_neighbors() {
    init_logging();
    let state = pick(AppState::new(), &["a.mp4", "b.mp4", "c.mp4"]);

    let (state, _) = update(
        state,
        Msg::MoveClicked {
            index: 2,
            direction: MoveDirection::Up,
        },
    );
    assert_eq!(row_names(&state), vec!["a.mp4", "c.mp4", "b.mp4"]);

    let (state, _) = update(
        state,
        Msg::MoveClicked {
            index: 0,
            direction: MoveDirection::Down,
        },
    );
    assert_eq!(row_names(&state), vec!["c.mp4", "a.mp4", "b.mp4"]);
}

#[test]
fn boundary_moves_are_noops() {
    init_logging();
    let state = pick(AppState::new(), &["a.mp4", "b.mp4"]);

    let (state, effects) = update(
        state,
        Msg::MoveClicked {
            index: 0,
            direction: MoveDirection::Up,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(row_names(&state), vec!["a.mp4", "b.mp4"]);

    let (mut state, effects) = update(
        state,
        Msg::MoveClicked {
            index: 1,
            direction: MoveDirection::Down,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(row_names(&state), vec!["a.mp4", "b.mp4"]);
    // Consume the dirty flag from the initial pick before checking that the
    // no-op moves did not mark a render.
    let _ = state.consume_dirty();
    let (mut state, _) = update(
        state,
        Msg::MoveClicked {
            index: 5,
            direction: MoveDirection::Up,
        },
    );
    assert!(!state.consume_dirty());
}

#[test]
fn remove_keeps_remaining_order_and_ignores_absent_ids() {
    init_logging();
    let state = pick(AppState::new(), &["a.mp4", "b.mp4", "c.mp4"]);
    let middle = state.view().clips[1].clip_id;

    let (state, _) = update(state, Msg::RemoveClicked { clip_id: middle });
    assert_eq!(row_names(&state), vec!["a.mp4", "c.mp4"]);

    let (mut state, effects) = update(state, Msg::RemoveClicked { clip_id: middle });
    assert!(effects.is_empty());
    assert_eq!(row_names(&state), vec!["a.mp4", "c.mp4"]);
    // Second removal of the same id is silent; the first one already
    // consumed the slot.
    let _ = state.consume_dirty();
    let (mut state, _) = update(state, Msg::RemoveClicked { clip_id: 9999 });
    assert!(!state.consume_dirty());
}

#[test]
fn ids_are_never_reused_after_removal() {
    init_logging();
    let state = pick(AppState::new(), &["a.mp4"]);
    let first = state.view().clips[0].clip_id;

    let (state, _) = update(state, Msg::RemoveClicked { clip_id: first });
    let state = pick(state, &["b.mp4"]);

    assert_ne!(state.view().clips[0].clip_id, first);
}

#[test]
fn clear_empties_the_list() {
    init_logging();
    let state = pick(AppState::new(), &["a.mp4", "b.mp4"]);
    let (state, effects) = update(state, Msg::ClearClicked);

    assert!(effects.is_empty());
    assert!(state.view().clips.is_empty());
    assert!(state.view().artifact.is_none());
}
