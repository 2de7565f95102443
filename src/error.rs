use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("surface '{0}' not found")]
    MissingSurface(String),
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),
    #[error("no WebGL2 context for '{0}'")]
    ContextUnavailable(String),
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("program failed to link: {0}")]
    ProgramLink(String),
    #[error("failed to allocate {0}")]
    Resource(&'static str),
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for EffectError {
    fn from(value: JsValue) -> Self {
        EffectError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<EffectError> for JsValue {
    fn from(err: EffectError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
