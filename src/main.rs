//! Scatterfield demo entry point
//!
//! Native: runs a scripted, headless session against a synthetic fragment
//! cloud and logs what the scene does. The browser build is driven from
//! JavaScript through `scatterfield::web::SceneCore` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use scatterfield::Tuning;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Scatterfield (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_from_path(&PathBuf::from(path)),
        None => Tuning::default(),
    };
    let dump_state = args.any(|a| a == "--dump");

    demo::run(tuning, dump_state);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::SceneCore, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec3;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use scatterfield::consts::*;
    use scatterfield::renderer::{FiringUniform, collect_instances};
    use scatterfield::sim::{
        AnimatedSpec, FrameClock, GeometryHandle, InputMailbox, SceneState, TextRole, Viewport,
        active_fraction,
    };
    use scatterfield::Tuning;

    const SEED: u64 = 0x5ca7_7e4f;
    const TRIANGLES: usize = 600;
    const VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);
    const DOCUMENT_HEIGHT: f32 = 3600.0;

    /// Triangle soup on a unit-ish sphere shell, standing in for a loaded mesh
    fn synthetic_soup(rng: &mut Pcg32) -> Vec<f32> {
        let mut soup = Vec::with_capacity(TRIANGLES * 9);
        for _ in 0..TRIANGLES {
            let theta: f32 = rng.random_range(0.0..std::f32::consts::TAU);
            let phi: f32 = rng.random_range(-1.0f32..1.0).acos();
            let r: f32 = rng.random_range(0.9..1.1);
            let center = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()) * r;
            for _ in 0..3 {
                let jitter = Vec3::new(
                    rng.random_range(-0.08..0.08),
                    rng.random_range(-0.08..0.08),
                    rng.random_range(-0.08..0.08),
                );
                soup.extend_from_slice(&(center + jitter).to_array());
            }
        }
        soup
    }

    /// Vertices of the point shell, for sampling the firing signal
    fn shell_vertices(rng: &mut Pcg32) -> Vec<Vec3> {
        (0..2000)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                )
            })
            .collect()
    }

    fn build_scene(tuning: Tuning, rng: &mut Pcg32) -> SceneState {
        let mut state = SceneState::new(tuning, VIEWPORT);
        state.resize(VIEWPORT, DOCUMENT_HEIGHT);

        let soup = synthetic_soup(rng);
        state.register_triangle_soup(&soup, FRAGMENT_MESH_SCALE, Vec3::from_array(FRAGMENT_ANCHOR), 0);

        let tuning = state.tuning.clone();
        let next = state.fragments.len() as u32;
        state.register_object(AnimatedSpec::solid_shell(GeometryHandle(next), &tuning));
        state.register_object(AnimatedSpec::point_shell(GeometryHandle(next + 1), &tuning));

        for (i, role) in [TextRole::Headline, TextRole::Greeting, TextRole::Tagline, TextRole::Farewell]
            .into_iter()
            .enumerate()
        {
            state.register_text(GeometryHandle(next + 2 + i as u32), role);
        }
        state
    }

    /// Scripted input for frame `i`: sweep the pointer across the cluster,
    /// then scroll to the bottom of the page
    fn script(i: u32, mailbox: &mut InputMailbox) {
        match i {
            0..=179 => {
                let t = i as f32 / 179.0;
                mailbox.post_pointer(VIEWPORT.width * (0.2 + 0.6 * t), VIEWPORT.height * 0.7);
            }
            180..=239 => mailbox.post_pointer(5.0, 5.0),
            240..=599 => {
                let t = (i - 240) as f32 / 359.0;
                mailbox.post_scroll(t * (DOCUMENT_HEIGHT - VIEWPORT.height));
            }
            _ => {}
        }
    }

    pub fn run(tuning: Tuning, dump_state: bool) {
        let mut rng = Pcg32::seed_from_u64(SEED);
        let mut state = build_scene(tuning, &mut rng);
        let vertices = shell_vertices(&mut rng);

        let mut clock = FrameClock::new();
        let mut mailbox = InputMailbox::new();

        for frame in 0..720u32 {
            script(frame, &mut mailbox);
            clock.advance(&mut state, &mut mailbox, FRAME_DT);

            if frame % 60 == 0 {
                let shell_scale = state.objects.first().map(|o| o.current_scale()).unwrap_or(0.0);
                log::info!(
                    "frame {:>3}: scroll {:.2} strength {:.2} repelled {:>3} max offset {:>6.2} shell {:.2} firing {:>4.1}%",
                    frame,
                    state.scroll.fraction,
                    state.scroll.effect_strength,
                    state.repelled,
                    state.fragments.max_displacement(),
                    shell_scale,
                    active_fraction(&vertices, state.firing_time(), &state.tuning.firing) * 100.0,
                );
            }
        }

        let (handles, instances) = collect_instances(&state);
        let uniform = FiringUniform::from_scene(&state);
        log::info!(
            "done: {} steps, {} instances ({} bytes), firing time {:.1}",
            clock.steps,
            handles.len(),
            std::mem::size_of_val(instances.as_slice()),
            uniform.time,
        );

        if dump_state {
            match serde_json::to_string_pretty(&state) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Cannot serialize scene: {e}"),
            }
        }
    }
}
