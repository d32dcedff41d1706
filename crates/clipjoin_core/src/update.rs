use crate::{AppState, Effect, JobState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AppStarted => {
            if state.begin_engine_load() {
                vec![Effect::EnsureEngineReady]
            } else {
                Vec::new()
            }
        }
        Msg::ClipsPicked(files) => {
            state.add_clips(files);
            Vec::new()
        }
        Msg::RemoveClicked { clip_id } => {
            state.remove_clip(clip_id);
            Vec::new()
        }
        Msg::MoveClicked { index, direction } => {
            state.move_clip(index, direction);
            Vec::new()
        }
        Msg::ClearClicked => {
            state.clear_all();
            Vec::new()
        }
        Msg::JoinClicked => {
            if state.job() == JobState::Running {
                // One job at a time; the click is dropped, not queued.
                Vec::new()
            } else if state.clip_count() < 2 {
                state.reject_short_join();
                Vec::new()
            } else {
                let clips = state.begin_job();
                vec![Effect::StartJoin { clips }]
            }
        }
        Msg::EngineLoadFinished { result } => {
            state.engine_load_finished(result);
            Vec::new()
        }
        Msg::JobProgress { stage } => {
            state.job_progress(stage);
            Vec::new()
        }
        Msg::JobFinished { result } => {
            state.job_finished(result);
            Vec::new()
        }
        Msg::EngineLog(line) => {
            state.record_log(line);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
