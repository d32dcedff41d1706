use std::time::Duration;

use clipjoin_core::{
    update, AppState, AppViewModel, ClipFile, EngineState, JobState, MoveDirection, Msg,
};
use eframe::egui;

use crate::effects::EffectRunner;

pub struct ClipjoinApp {
    state: AppState,
    runner: EffectRunner,
    view: AppViewModel,
}

impl ClipjoinApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let state = AppState::new();
        let view = state.view();
        let mut app = Self {
            state,
            runner: EffectRunner::new(),
            view,
        };
        // Warm-load the engine while the user is still picking files.
        app.dispatch(Msg::AppStarted);
        app
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);
        if state.consume_dirty() {
            self.view = state.view();
        }
        self.state = state;
    }

    fn save_artifact(&mut self) {
        let Some(artifact) = self.state.artifact() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&artifact.file_name)
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, &artifact.bytes) {
            Ok(()) => log::info!(
                "saved {} bytes to {}",
                artifact.bytes.len(),
                path.display()
            ),
            Err(err) => log::error!("could not save artifact: {err}"),
        }
    }
}

impl eframe::App for ClipjoinApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for msg in self.runner.poll() {
            self.dispatch(msg);
        }

        let view = self.view.clone();
        let mut pending: Vec<Msg> = Vec::new();
        let mut save_requested = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Clipjoin");
            ui.label("Combine clips into one file, in order, without re-encoding.");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Add videos…").clicked() {
                    pending.push(pick_clips_msg());
                }
                let clear_enabled = !view.clips.is_empty() || view.artifact.is_some();
                if ui
                    .add_enabled(clear_enabled, egui::Button::new("Clear all"))
                    .clicked()
                {
                    pending.push(Msg::ClearClicked);
                }
            });

            ui.add_space(8.0);
            for (index, row) in view.clips.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.monospace(format!("{}.", index + 1));
                    ui.label(&row.file_name);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            pending.push(Msg::RemoveClicked {
                                clip_id: row.clip_id,
                            });
                        }
                        if ui.button("⬇").clicked() {
                            pending.push(Msg::MoveClicked {
                                index,
                                direction: MoveDirection::Down,
                            });
                        }
                        if ui.button("⬆").clicked() {
                            pending.push(Msg::MoveClicked {
                                index,
                                direction: MoveDirection::Up,
                            });
                        }
                    });
                });
            }

            ui.add_space(8.0);
            if ui
                .add_enabled(view.can_join, egui::Button::new("Join videos"))
                .clicked()
            {
                pending.push(Msg::JoinClicked);
            }

            ui.add_space(8.0);
            ui.label(&view.status);
            if let Some(diagnostic) = &view.diagnostic {
                ui.small(diagnostic);
            }

            if let Some(artifact) = &view.artifact {
                ui.add_space(8.0);
                ui.separator();
                ui.label(format!(
                    "{} ({:.1} MB)",
                    artifact.file_name,
                    artifact.byte_len as f64 / (1024.0 * 1024.0)
                ));
                if ui.button("Save combined video…").clicked() {
                    save_requested = true;
                }
            }
        });

        if save_requested {
            self.save_artifact();
        }
        for msg in pending {
            self.dispatch(msg);
        }

        // Engine events arrive on a channel, not as input events; keep
        // repainting while work is in flight so they get drained.
        if self.view.job == JobState::Running || self.view.engine == EngineState::Loading {
            ctx.request_repaint_after(Duration::from_millis(75));
        }
    }
}

fn pick_clips_msg() -> Msg {
    let files = rfd::FileDialog::new()
        .add_filter("Videos", &["mp4", "mov", "mkv", "webm", "avi", "m4v"])
        .pick_files()
        .unwrap_or_default();
    let clips = files
        .into_iter()
        .map(|path| ClipFile {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "clip.mp4".to_string()),
            path,
        })
        .collect();
    Msg::ClipsPicked(clips)
}
