use std::sync::Arc;
use std::time::Duration;

use rosecanvas::geometry::FracRect;
use rosecanvas::render::{FixedAdvance, ImageId, Palette, Rgba, Style, StylePair};
use rosecanvas::{
    action, Config, DrawCommand, MenuMode, Octant, Point, Quadrant, Renderer, Scene, ShowTracker, Size, Target,
};
use tokio::runtime::Handle;
use tokio::time::Instant;

/// Tallies draw commands instead of painting them.
#[derive(Debug, Default)]
struct TraceRenderer {
    rects: usize,
    paths: usize,
    texts: usize,
    images: usize,
}

impl Renderer for TraceRenderer {
    fn execute(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear { .. } => *self = Self::default(),
            DrawCommand::Rect { .. } => self.rects += 1,
            DrawCommand::Path { .. } => self.paths += 1,
            DrawCommand::Text { .. } => self.texts += 1,
            DrawCommand::Image { .. } => self.images += 1,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    // optional first argument overrides the menu mode
    config.menu_mode = MenuMode::parse_or(std::env::args().nth(1).as_deref(), config.menu_mode);

    let mut scene = match Scene::new(config, Arc::new(FixedAdvance::new(0.55)), Box::new(Palette::default()), Handle::current()) {
        Ok(scene) => scene,
        Err(e) => {
            tracing::error!(error = %e, "scene setup failed");
            std::process::exit(2);
        }
    };

    for (i, caption) in ["Tap", "Hold", "Swipe", "Rest on the picture"].into_iter().enumerate() {
        scene.add_text_in_quadrant(caption, Quadrant::from_index(i));
    }
    scene.add_image(ImageId(1), Size::new(1600.0, 1200.0), Target::uniform(FracRect::new(0.0, 0.5, 1.0, 1.0)));
    for (octant, label) in [(0, "up"), (2, "left"), (4, "down"), (6, "right")] {
        scene.bind_command(Octant::new(octant), label, action(move || tracing::info!(label, "command")), false);
    }
    let warning = StylePair { ink: Style::fill(Rgba(0xffb0_2020)), accent: Style::fill(Rgba(0x40ff_d0d0)) };
    scene.bind_styled_command(Octant::new(5), "quit", action(|| tracing::info!("quit chosen")), false, warning);
    scene.set_user_tapped(Some(action(|| tracing::info!("tapped"))));
    scene.set_no_command_handler(Some(action(|| tracing::info!("no command there"))));
    scene.set_on_show(Some(action(|| tracing::info!("scene on screen"))));

    let mut shows = ShowTracker::new();
    shows.show(&mut scene);

    let surface = Size::new(1280.0, 800.0);
    let mut renderer = TraceRenderer::default();
    scene.draw(surface, &mut renderer);
    tracing::info!(?renderer, "first frame");

    // a tap, then a held swipe east
    let t0 = Instant::now();
    scene.press_at(300.0, 200.0, t0);
    scene.release_at(300.0, 200.0, t0 + Duration::from_millis(80));

    let t1 = t0 + Duration::from_secs(1);
    scene.press_at(640.0, 400.0, t1);
    for step in 1..=10u32 {
        let x = 640.0 + f64::from(step) * 20.0;
        scene.drag_at(x, 400.0, t1 + Duration::from_millis(100 * u64::from(step)));
    }
    let frame = scene.frame(surface, t1 + Duration::from_millis(1000));
    for command in &frame {
        renderer.execute(command);
    }
    tracing::info!(?renderer, "frame with rose");
    let gesture = scene.release_at(840.0, 400.0, t1 + Duration::from_millis(1100));
    tracing::info!(?gesture, "released");

    // rest a finger on the image long enough to zoom
    let at = Point::new(640.0, 600.0);
    scene.press(at.x, at.y);
    if let Some(id) = scene.activate_magnifier_at(at, Instant::now()) {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        tracing::info!(element = id.0, magnification = ?scene.magnification(), "magnified");
        scene.release(at.x, at.y);
        if let Some(task) = scene.retire_magnifier() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "magnifier task failed");
            }
        }
    }

    // let queued actions finish
    tokio::time::sleep(Duration::from_millis(100)).await;
}
