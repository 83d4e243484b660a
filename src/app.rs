//! Wires the WebGL sample together: context, renderer, resize handling and
//! the frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{self, GlBackend, GlHost};
use crate::config::DemoConfig;
use crate::error::{self, DemoError};
use crate::renderer::Renderer;
use crate::scheduler::{Debouncer, Scheduler};
use crate::shader::ShaderSources;
use crate::sizing::Surface;

pub type SharedRenderer<H> =
    Rc<RefCell<Renderer<<H as GlHost>::Backend, <H as GlHost>::Surface>>>;

/// Acquires a context and brings a renderer to `Ready`.
///
/// Nothing past the failing step runs; a context obtained before a later
/// failure is dropped along with the half-built renderer.
pub fn initialize<H, Src>(
    host: &H,
    sources: &Src,
    config: &DemoConfig,
) -> Result<Renderer<H::Backend, H::Surface>, DemoError>
where
    H: GlHost + ?Sized,
    Src: ShaderSources + ?Sized,
{
    let gl = backend::acquire_context(host, &config.context_ids)?;
    let mut renderer = Renderer::new(gl, host.surface(), config);
    renderer.initialize(sources)?;
    Ok(renderer)
}

/// Runs the whole sample: initialize, subscribe to debounced resizes and
/// start the frame loop. Failures are alerted once and returned.
pub fn launch_webgl_sample<H, Src, Sch>(
    host: &H,
    scheduler: Rc<Sch>,
    sources: &Src,
    config: &DemoConfig,
) -> Result<SharedRenderer<H>, DemoError>
where
    H: GlHost,
    H::Backend: 'static,
    H::Surface: 'static,
    Src: ShaderSources + ?Sized,
    Sch: Scheduler + 'static,
{
    let renderer = initialize(host, sources, config).map_err(|err| error::report(host, err))?;
    let renderer = Rc::new(RefCell::new(renderer));

    let debouncer = Debouncer::new(Rc::clone(&scheduler), config.resize_debounce_ms);
    let target = Rc::clone(&renderer);
    host.on_resize(Box::new(move || {
        let target = Rc::clone(&target);
        let scheduled = debouncer.trigger(move || {
            target.borrow_mut().adjust_canvas_size();
        });
        if let Err(err) = scheduled {
            log::error!("could not schedule resize: {err}");
        }
    }))
    .map_err(|err| error::report(host, err))?;

    run_loop(Rc::clone(&renderer), scheduler).map_err(|err| error::report(host, err))?;
    Ok(renderer)
}

/// Starts the renderer and keeps exactly one frame in flight: each frame
/// requests the next only after it has drawn.
pub fn run_loop<B, S, Sch>(
    renderer: Rc<RefCell<Renderer<B, S>>>,
    scheduler: Rc<Sch>,
) -> Result<(), DemoError>
where
    B: GlBackend + 'static,
    S: Surface + 'static,
    Sch: Scheduler + 'static,
{
    renderer.borrow_mut().start()?;
    request_next_frame(renderer, scheduler)
}

fn request_next_frame<B, S, Sch>(
    renderer: Rc<RefCell<Renderer<B, S>>>,
    scheduler: Rc<Sch>,
) -> Result<(), DemoError>
where
    B: GlBackend + 'static,
    S: Surface + 'static,
    Sch: Scheduler + 'static,
{
    let next = Rc::clone(&scheduler);
    scheduler.request_frame(Box::new(move |now_ms| {
        let drawn = renderer.borrow_mut().render_frame(now_ms);
        if let Err(err) = drawn.and_then(|_| request_next_frame(renderer, next)) {
            log::error!("render loop stopped: {err}");
        }
    }))
}
