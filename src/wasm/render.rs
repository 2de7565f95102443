use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject, Window,
};

use crate::config::SurfaceSpec;
use crate::effect::{BackingSize, FrameUniforms, RenderSurface};
use crate::error::EffectError;
use crate::shader;
use crate::theme::Theme;

/// A canvas with the water program compiled into its own WebGL2 context.
pub struct GlSurface {
    id: String,
    canvas: HtmlCanvasElement,
    gl: GL,
    _program: WebGlProgram,
    _quad: WebGlBuffer,
    _vao: WebGlVertexArrayObject,
    resolution: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    is_dark: Option<WebGlUniformLocation>,
    dpr: Option<WebGlUniformLocation>,
    hover: Option<WebGlUniformLocation>,
}

impl GlSurface {
    /// Binds the effect to the canvas named by `spec`, or `None` when the
    /// page has no such canvas or the browser refuses a context.
    pub fn create(document: &Document, spec: &SurfaceSpec) -> Option<Self> {
        match Self::try_create(document, spec) {
            Ok(surface) => Some(surface),
            Err(err) => {
                log::debug!("{err}");
                None
            }
        }
    }

    fn try_create(document: &Document, spec: &SurfaceSpec) -> Result<Self, EffectError> {
        let canvas = document
            .get_element_by_id(&spec.id)
            .ok_or_else(|| EffectError::MissingSurface(spec.id.clone()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EffectError::NotACanvas(spec.id.clone()))?;

        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"antialias".into(), &JsValue::TRUE)?;
        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or_else(|| EffectError::ContextUnavailable(spec.id.clone()))?
            .dyn_into()
            .map_err(|_| EffectError::ContextUnavailable(spec.id.clone()))?;

        let vs = compile_shader(&gl, GL::VERTEX_SHADER, "vertex", shader::VERTEX_SHADER)?;
        let fs = compile_shader(&gl, GL::FRAGMENT_SHADER, "fragment", shader::FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vs, &fs)?;
        gl.use_program(Some(&program));

        let vao = gl
            .create_vertex_array()
            .ok_or(EffectError::Resource("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let quad = gl.create_buffer().ok_or(EffectError::Resource("quad buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
        let vertices = js_sys::Float32Array::from(&shader::QUAD_VERTICES[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
        if let Ok(position) = u32::try_from(gl.get_attrib_location(&program, shader::ATTR_POSITION)) {
            gl.enable_vertex_attrib_array(position);
            gl.vertex_attrib_pointer_with_i32(position, 2, GL::FLOAT, false, 0, 0);
        }

        let fade_top = gl.get_uniform_location(&program, shader::U_FADE_TOP);
        gl.uniform1f(fade_top.as_ref(), spec.fade.uniform_value());

        Ok(Self {
            id: spec.id.clone(),
            resolution: gl.get_uniform_location(&program, shader::U_RESOLUTION),
            time: gl.get_uniform_location(&program, shader::U_TIME),
            is_dark: gl.get_uniform_location(&program, shader::U_IS_DARK),
            dpr: gl.get_uniform_location(&program, shader::U_DPR),
            hover: gl.get_uniform_location(&program, shader::U_HOVER),
            canvas,
            gl,
            _program: program,
            _quad: quad,
            _vao: vao,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl RenderSurface for GlSurface {
    fn id(&self) -> &str {
        &self.id
    }

    fn resize(&mut self, effective_dpr: f64) -> BackingSize {
        let size = BackingSize::from_logical(
            self.canvas.offset_width() as f64,
            self.canvas.offset_height() as f64,
            effective_dpr,
        );
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        self.gl.viewport(0, 0, size.width as i32, size.height as i32);
        self.gl
            .uniform2f(self.resolution.as_ref(), size.width as f32, size.height as f32);
        size
    }

    fn draw(&mut self, uniforms: &FrameUniforms) {
        self.gl.uniform1f(self.time.as_ref(), uniforms.time);
        self.gl.uniform1f(self.is_dark.as_ref(), uniforms.is_dark);
        self.gl.uniform1f(self.dpr.as_ref(), uniforms.dpr);
        self.gl.uniform1f(self.hover.as_ref(), uniforms.hover);
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
    }
}

/// Compile failures are logged, not returned: the surface keeps running
/// with a program that draws nothing useful.
fn compile_shader(
    gl: &GL,
    kind: u32,
    stage: &'static str,
    source: &str,
) -> Result<WebGlShader, EffectError> {
    let shader = gl.create_shader(kind).ok_or(EffectError::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !compiled {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        log::error!("{}", EffectError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

fn link_program(gl: &GL, vs: &WebGlShader, fs: &WebGlShader) -> Result<WebGlProgram, EffectError> {
    let program = gl.create_program().ok_or(EffectError::Resource("program"))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);
    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !linked {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        log::error!("{}", EffectError::ProgramLink(log));
    }
    Ok(program)
}

/// Page theme: `data-theme` on the root element, else the colour-scheme query.
pub fn current_theme(window: &Window) -> Theme {
    let attribute = window
        .document()
        .and_then(|d| d.document_element())
        .and_then(|root| root.get_attribute("data-theme"));
    let prefers_dark = window
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false);
    Theme::resolve(attribute.as_deref(), prefers_dark)
}

struct LoopInner {
    window: Window,
    pending: Cell<Option<i32>>,
    running: Cell<bool>,
    stopped: Cell<bool>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopInner {
    fn request(&self) {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.pending.set(Some(handle)),
            Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
        }
    }
}

/// Self-rescheduling animation-frame loop with an explicit stop.
#[derive(Clone)]
pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

impl FrameLoop {
    /// Every callback schedules the next one before calling `on_frame`, so
    /// the loop stays alive while frames are skipped.
    pub fn start(window: Window, mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let inner = Rc::new(LoopInner {
            window,
            pending: Cell::new(None),
            running: Cell::new(true),
            stopped: Cell::new(false),
            callback: RefCell::new(None),
        });

        // The closure only holds a weak handle; the loop lives as long as a
        // `FrameLoop` does.
        let weak = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.pending.set(None);
            if !inner.running.get() {
                return;
            }
            inner.request();
            on_frame(timestamp);
        });
        *inner.callback.borrow_mut() = Some(callback);
        inner.request();

        Self { inner }
    }

    /// Pauses the loop; `resume` picks it up again.
    pub fn cancel(&self) {
        self.inner.running.set(false);
        if let Some(handle) = self.inner.pending.take() {
            if let Err(err) = self.inner.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
    }

    /// Cancels the loop permanently; later `resume` calls are ignored.
    pub fn stop(&self) {
        self.inner.stopped.set(true);
        self.cancel();
    }

    pub fn resume(&self) {
        if self.inner.stopped.get() || self.inner.running.replace(true) {
            return;
        }
        self.inner.request();
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}
