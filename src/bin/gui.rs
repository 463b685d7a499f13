use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use clap::Parser;
use mowersim::{Cell, Config, Definition, LawnBounds, SimStatus, format_summary, load_status, logging};

// ---------- Constants ----------
const WINDOW_TITLE: &str = "Mowersim Replay";
const HISTORY_PANEL_HEADING: &str = "Pos History";
const VISITED_PANEL_HEADING: &str = "Visited Cells";

#[derive(Parser)]
#[command(name = "gui", about = "Replay a lawnmower simulation")]
struct Args {
	/// Definition file (.txt) or saved result record (.json)
	#[arg(name = "FILE")]
	file: Option<PathBuf>,

	#[arg(long)]
	config: Option<PathBuf>,
}

// ---------- Components ----------
#[derive(Component)]
struct CellPos {
	row: i32,
	col: i32,
}

#[derive(Component)]
struct LawnLayer; // Marker to despawn/rebuild when the record is reloaded

#[derive(Component)]
struct MowerMarker;

// ---------- Resources ----------
#[derive(Resource)]
struct Replay {
	status: SimStatus,
	valid_rocks: HashSet<Cell>,
	visited: HashSet<Cell>,
	step: usize,
	playing: bool,
	elapsed: f32,
	interval: f32,
}

impl Replay {
	fn new(status: SimStatus, interval: f32) -> Self {
		let valid_rocks = status.valid_rocks.iter().copied().collect();
		let visited = status.visited_cells.iter().copied().collect();
		Self {
			status,
			valid_rocks,
			visited,
			step: 0,
			playing: false,
			elapsed: 0.0,
			interval,
		}
	}

	fn last_step(&self) -> usize {
		self.status.pos_history.len().saturating_sub(1)
	}

	fn at_crash(&self) -> bool {
		self.status.did_mower_crash && self.step == self.last_step()
	}

	fn current_cell(&self) -> Cell {
		self.status.pos_history.get(self.step).copied().unwrap_or(self.status.start_pos)
	}

	/// Cells cut by the time the replay reaches `step`.
	fn cut_so_far(&self) -> HashSet<Cell> {
		self.status.pos_history[..=self.step.min(self.last_step())]
			.iter()
			.copied()
			.filter(|c| self.visited.contains(c))
			.collect()
	}

	fn bounds(&self) -> LawnBounds {
		LawnBounds::new(self.status.grid_height, self.status.grid_width)
	}
}

/// File the record came from; `None` replays the built-in scenario.
#[derive(Resource)]
struct RecordSource(Option<PathBuf>);

#[derive(Resource)]
struct UiState {
	cell_size: f32,
	request_rebuild_lawn: bool,
	toast: Option<(String, f32)>, // (message, remaining_seconds)
}

// ---------- Entry ----------
fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	let (config, config_error) = Config::resolve(args.config.as_deref())?;
	logging::init(&config.logging.level);
	if let Some(e) = config_error {
		tracing::warn!("{}; using default configuration", e);
	}
	let status = load_record(args.file.as_deref())?;
	let source = RecordSource(args.file);

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: format!("{} - {}", WINDOW_TITLE, status.test_name),
				resolution: (1280, 800).into(),
				..Default::default()
			}),
			..Default::default()
		}))
		.add_plugins(EguiPlugin::default())
		// Resources
		.insert_resource(UiState {
			cell_size: config.viewer.cell_size,
			request_rebuild_lawn: true,
			toast: None,
		})
		.insert_resource(Replay::new(status, config.viewer.replay_interval_secs))
		.insert_resource(source)
		// Setup
		.add_systems(Startup, setup_camera)
		// Frame systems
		.add_systems(
			Update,
			(
				handle_pan_zoom,
				build_lawn_when_needed,
				advance_replay,
				update_cell_colors,
				update_mower_marker,
				update_toast_timer,
			),
		)
		.add_systems(EguiPrimaryContextPass, draw_ui)
		.run();
	Ok(())
}

/// A `.json` argument is a saved result record, anything else a definition.
fn load_record(file: Option<&Path>) -> anyhow::Result<SimStatus> {
	match file {
		Some(path) if path.extension().is_some_and(|e| e == "json") => Ok(load_status(path)?),
		Some(path) => Ok(Definition::from_file(path)?.run()),
		None => Ok(Definition::default_scenario().run()),
	}
}

// ---------- Setup ----------
fn setup_camera(mut commands: Commands, ui: Res<UiState>, replay: Res<Replay>) {
	let bounds = replay.bounds();
	let center_x = (bounds.width as f32) * ui.cell_size * 0.5;
	let center_y = -(bounds.height as f32) * ui.cell_size * 0.5;
	commands.spawn((Camera2d, Transform::from_xyz(center_x, center_y, 1000.0)));
}

// ---------- Utilities ----------
fn cell_to_world(c: Cell, cell_size: f32, z: f32) -> Vec3 {
	// Rows grow downwards on the lawn, so they map to negative Y.
	Vec3::new(
		c.col as f32 * cell_size + cell_size * 0.5,
		-(c.row as f32 * cell_size + cell_size * 0.5),
		z,
	)
}

fn cell_color(replay: &Replay, cut: &HashSet<Cell>, c: Cell) -> Color {
	if replay.at_crash() && c == replay.status.last_pos {
		return Color::srgb(0.85, 0.15, 0.12);
	}
	if replay.valid_rocks.contains(&c) {
		return Color::srgb(0.5, 0.5, 0.52);
	}
	if !replay.bounds().contains(c) {
		return Color::srgba(0.0, 0.0, 0.0, 0.0);
	}
	if cut.contains(&c) {
		Color::srgb(0.62, 0.85, 0.45)
	} else {
		Color::srgb(0.12, 0.42, 0.14)
	}
}

fn set_toast(ui: &mut UiState, msg: impl Into<String>) {
	ui.toast = Some((msg.into(), 2.0));
}

/// Re-reads the record from disk and schedules a lawn rebuild. A failed
/// reload keeps the current replay.
fn reload_record(ui: &mut UiState, replay: &mut Replay, source: Option<&Path>) {
	match load_record(source) {
		Ok(status) => {
			tracing::info!(test_name = %status.test_name, "Record reloaded");
			let interval = replay.interval;
			*replay = Replay::new(status, interval);
			ui.request_rebuild_lawn = true;
			set_toast(ui, "Record reloaded");
		}
		Err(e) => {
			tracing::warn!("Reload failed: {:#}", e);
			set_toast(ui, format!("Reload failed: {}", e));
		}
	}
}

// ---------- Systems: Lawn Rendering ----------
fn build_lawn_when_needed(
	mut commands: Commands,
	mut ui: ResMut<UiState>,
	replay: Res<Replay>,
	existing_layers: Query<Entity, With<LawnLayer>>,
) {
	if !ui.request_rebuild_lawn {
		return;
	}
	for e in &existing_layers {
		commands.entity(e).despawn();
	}

	let size = ui.cell_size;
	let tile = Vec2::splat(size - 2.0);
	// Off-lawn cells only show up when the mower crashed through the fence.
	let off_lawn = replay.status.pos_history.iter().copied().filter(|c| !replay.bounds().contains(*c));
	for c in replay.bounds().iter_cells().chain(off_lawn) {
		commands.spawn((
			Sprite::from_color(Color::srgb(0.12, 0.42, 0.14), tile),
			Transform::from_translation(cell_to_world(c, size, 0.0)),
			Visibility::Visible,
			CellPos { row: c.row, col: c.col },
			LawnLayer,
		));
	}
	commands.spawn((
		Sprite::from_color(Color::srgb(0.95, 0.8, 0.1), Vec2::splat(size * 0.5)),
		Transform::from_translation(cell_to_world(replay.current_cell(), size, 5.0)),
		MowerMarker,
		LawnLayer,
	));
	ui.request_rebuild_lawn = false;
}

fn update_cell_colors(replay: Res<Replay>, mut q: Query<(&CellPos, &mut Sprite)>) {
	if !replay.is_changed() {
		return;
	}
	let cut = replay.cut_so_far();
	for (pos, mut sprite) in &mut q {
		sprite.color = cell_color(&replay, &cut, Cell::new(pos.row, pos.col));
	}
}

fn update_mower_marker(
	replay: Res<Replay>,
	ui: Res<UiState>,
	mut q: Query<&mut Transform, With<MowerMarker>>,
) {
	for mut t in &mut q {
		t.translation = cell_to_world(replay.current_cell(), ui.cell_size, 5.0);
	}
}

// ---------- Systems: Camera Pan/Zoom ----------
fn handle_pan_zoom(
	mut ev_motion: EventReader<bevy::input::mouse::MouseMotion>,
	mut ev_wheel: EventReader<bevy::input::mouse::MouseWheel>,
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	mut q_cam: Query<(&mut Projection, &mut Transform), With<Camera>>,
) {
	let (mut proj, mut cam_transform) = if let Ok(v) = q_cam.single_mut() { v } else { return };

	if mouse_buttons.pressed(MouseButton::Middle) {
		let mut delta = Vec2::ZERO;
		for m in ev_motion.read() {
			delta += m.delta;
		}
		cam_transform.translation.x -= delta.x;
		cam_transform.translation.y += delta.y;
	}

	for w in ev_wheel.read() {
		let factor = 1.0 - w.y * 0.1;
		if let Projection::Orthographic(ortho) = &mut *proj {
			ortho.scale = (ortho.scale * factor).clamp(0.2, 10.0);
		}
	}
}

// ---------- Systems: Replay ----------
fn advance_replay(time: Res<Time>, mut replay: ResMut<Replay>) {
	if !replay.playing {
		return;
	}
	replay.elapsed += time.delta_secs();
	if replay.elapsed < replay.interval {
		return;
	}
	replay.elapsed = 0.0;
	if replay.step < replay.last_step() {
		replay.step += 1;
	} else {
		replay.playing = false;
	}
}

// ---------- Systems: Toast ----------
fn update_toast_timer(time: Res<Time>, mut ui: ResMut<UiState>) {
	if let Some((_, ref mut remaining)) = ui.toast {
		*remaining -= time.delta_secs();
		if *remaining <= 0.0 {
			ui.toast = None;
		}
	}
}

// ---------- Systems: UI ----------
fn draw_ui(
	mut egui_ctx: EguiContexts,
	mut ui: ResMut<UiState>,
	mut replay: ResMut<Replay>,
	source: Res<RecordSource>,
) {
	let Ok(ctx) = egui_ctx.ctx_mut() else { return };

	// Top HUD
	egui::TopBottomPanel::top("top_hud").show(&*ctx, |ui_top| {
		ui_top.horizontal(|ui_row| {
			ui_row.label(format_summary(&replay.status));
			ui_row.separator();
			ui_row.label(format!("Step {}/{}", replay.step, replay.last_step()));
			let play_label = if replay.playing { "Pause" } else { "Play" };
			if ui_row.button(play_label).clicked() {
				if replay.step == replay.last_step() {
					replay.step = 0;
				}
				replay.playing = !replay.playing;
			}
			if ui_row.button("Step").clicked() {
				replay.playing = false;
				if replay.step < replay.last_step() {
					replay.step += 1;
				} else {
					set_toast(&mut ui, "Replay finished");
				}
			}
			if ui_row.button("Reset").clicked() {
				replay.playing = false;
				replay.step = 0;
			}
			if ui_row.button("Reload").clicked() {
				reload_record(&mut ui, &mut replay, source.0.as_deref());
			}
			if let Some((ref msg, _)) = ui.toast {
				ui_row.separator();
				ui_row.colored_label(egui::Color32::YELLOW, msg);
			}
		});
	});

	// Right panel (history / visited)
	egui::SidePanel::right("right_panel")
		.resizable(true)
		.default_width(240.0)
		.show(&*ctx, |ui_right| {
			ui_right.heading(HISTORY_PANEL_HEADING);
			egui::ScrollArea::vertical().id_salt("history").max_height(320.0).show(ui_right, |ui_scroll| {
				for (idx, c) in replay.status.pos_history.clone().into_iter().enumerate() {
					let selected = idx == replay.step;
					if ui_scroll.selectable_label(selected, format!("Pos {}: {}", idx, c)).clicked() {
						replay.playing = false;
						replay.step = idx;
					}
				}
			});
			ui_right.separator();
			ui_right.heading(VISITED_PANEL_HEADING);
			egui::ScrollArea::vertical().id_salt("visited").show(ui_right, |ui_scroll| {
				for (idx, c) in replay.status.visited_cells.iter().enumerate() {
					ui_scroll.label(format!("Cell {}: {}", idx, c));
				}
			});
		});

	// Bottom console with the run trace
	egui::TopBottomPanel::bottom("bottom_console").resizable(true).show(&*ctx, |ui_bottom| {
		egui::ScrollArea::vertical().stick_to_bottom(true).show(ui_bottom, |ui_logs| {
			for line in &replay.status.messages {
				ui_logs.label(line.trim_start());
			}
		});
	});
}
