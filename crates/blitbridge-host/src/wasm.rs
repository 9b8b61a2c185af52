//! wasmtime-backed [`GuestModule`].
//!
//! The module imports the bridge verbs under `env` and exports `init`,
//! `update` and `memory`. Every import forwards to [`HostImports`] on the
//! store's [`Bridge`]; a [`DeviceError`](blitbridge_engine::canvas::DeviceError)
//! returned there traps the module.

use std::path::Path;

use anyhow::{Context, Result};
use blitbridge_engine::bridge::{Bridge, GuestModule, HostImports};
use wasmtime::{Caller, Engine, Linker, Module, Store, TypedFunc};

const IMPORT_MODULE: &str = "env";

pub struct WasmModule {
    store: Store<Bridge>,
    init: TypedFunc<f64, i32>,
    update: TypedFunc<f64, i32>,
}

impl WasmModule {
    /// Compiles and instantiates the module at `path` (binary or text format).
    pub fn from_file(path: &Path, bridge: Bridge) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_bytes(bytes, bridge).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn from_bytes(bytes: impl AsRef<[u8]>, bridge: Bridge) -> Result<Self> {
        let engine = Engine::default();
        let module = Module::new(&engine, bytes).context("failed to compile module")?;
        Self::instantiate(&engine, &module, bridge)
    }

    fn instantiate(engine: &Engine, module: &Module, bridge: Bridge) -> Result<Self> {
        let mut linker = Linker::new(engine);
        link_imports(&mut linker)?;

        let mut store = Store::new(engine, bridge);
        let instance = linker
            .instantiate(&mut store, module)
            .context("failed to instantiate module")?;

        let init = instance
            .get_typed_func::<f64, i32>(&mut store, "init")
            .context("module does not export `init(f64) -> i32`")?;
        let update = instance
            .get_typed_func::<f64, i32>(&mut store, "update")
            .context("module does not export `update(f64) -> i32`")?;

        if instance.get_memory(&mut store, "memory").is_none() {
            log::warn!("module exports no `memory`; create_texture with pixel data will fail");
        }

        Ok(Self { store, init, update })
    }
}

impl GuestModule for WasmModule {
    fn init(&mut self, timestamp_ms: f64) -> Result<i32> {
        self.init
            .call(&mut self.store, timestamp_ms)
            .context("module trapped in init")
    }

    fn update(&mut self, timestamp_ms: f64) -> Result<i32> {
        self.update
            .call(&mut self.store, timestamp_ms)
            .context("module trapped in update")
    }

    fn bridge(&self) -> &Bridge {
        self.store.data()
    }

    fn bridge_mut(&mut self) -> &mut Bridge {
        self.store.data_mut()
    }
}

/// Module memory holding a `width * height` RGBA image at `ptr`.
fn guest_pixels(memory: &[u8], ptr: u32, width: u32, height: u32) -> Option<&[u8]> {
    let len = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
    let start = ptr as usize;
    memory.get(start..start.checked_add(len)?)
}

fn create_texture(mut caller: Caller<'_, Bridge>, ptr: i32, width: i32, height: i32) -> i32 {
    // Pointers and sizes are unsigned on the module side.
    let (ptr, width, height) = (ptr as u32, width as u32, height as u32);

    if ptr == 0 {
        return caller.data_mut().create_texture(None, width, height);
    }

    let Some(memory) = caller.get_export("memory").and_then(|e| e.into_memory()) else {
        log::warn!("create_texture: module has no exported memory");
        return 0;
    };

    let (data, bridge) = memory.data_and_store_mut(&mut caller);
    match guest_pixels(data, ptr, width, height) {
        Some(pixels) => bridge.create_texture(Some(pixels), width, height),
        None => {
            log::warn!("create_texture: {width}x{height} image at {ptr:#x} is outside module memory");
            0
        }
    }
}

fn link_imports(linker: &mut Linker<Bridge>) -> Result<()> {
    let env = IMPORT_MODULE;

    linker.func_wrap(env, "get_keydown", |mut caller: Caller<'_, Bridge>| {
        caller.data_mut().get_keydown()
    })?;
    linker.func_wrap(env, "create_texture", create_texture)?;

    linker.func_wrap(env, "set_render_target", |mut caller: Caller<'_, Bridge>, handle: i32| -> Result<()> {
        Ok(caller.data_mut().set_render_target(handle)?)
    })?;
    linker.func_wrap(env, "set_render_source", |mut caller: Caller<'_, Bridge>, handle: i32| -> Result<()> {
        Ok(caller.data_mut().set_render_source(handle)?)
    })?;

    linker.func_wrap(env, "set_line_color", |mut caller: Caller<'_, Bridge>, index: i32| -> Result<()> {
        Ok(caller.data_mut().set_line_color(index)?)
    })?;
    linker.func_wrap(env, "set_fill_color", |mut caller: Caller<'_, Bridge>, index: i32| -> Result<()> {
        Ok(caller.data_mut().set_fill_color(index)?)
    })?;
    linker.func_wrap(env, "set_color_mod", |mut caller: Caller<'_, Bridge>, index: i32| -> Result<()> {
        Ok(caller.data_mut().set_color_mod(index)?)
    })?;

    linker.func_wrap(
        env,
        "set_rect_size",
        |mut caller: Caller<'_, Bridge>, sw: i32, sh: i32, dw: i32, dh: i32| {
            caller.data_mut().set_rect_size(sw, sh, dw, dh)
        },
    )?;
    linker.func_wrap(
        env,
        "render_copy",
        |mut caller: Caller<'_, Bridge>, sx: i32, sy: i32, dx: i32, dy: i32| -> Result<()> {
            Ok(caller.data_mut().render_copy(sx, sy, dx, dy)?)
        },
    )?;
    linker.func_wrap(
        env,
        "fill_rect",
        |mut caller: Caller<'_, Bridge>, x: i32, y: i32, w: i32, h: i32| {
            caller.data_mut().fill_rect(x, y, w, h)
        },
    )?;

    linker.func_wrap(env, "toggle_scale_factor", |mut caller: Caller<'_, Bridge>| {
        caller.data_mut().toggle_scale_factor()
    })?;

    linker.func_wrap(env, "begin_path", |mut caller: Caller<'_, Bridge>| {
        caller.data_mut().begin_path()
    })?;
    linker.func_wrap(env, "close_path", |mut caller: Caller<'_, Bridge>| {
        caller.data_mut().close_path()
    })?;
    linker.func_wrap(env, "move_to", |mut caller: Caller<'_, Bridge>, x: i32, y: i32| {
        caller.data_mut().move_to(x, y)
    })?;
    linker.func_wrap(env, "line_to", |mut caller: Caller<'_, Bridge>, x: i32, y: i32| {
        caller.data_mut().line_to(x, y)
    })?;
    linker.func_wrap(env, "stroke", |mut caller: Caller<'_, Bridge>| {
        caller.data_mut().stroke()
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blitbridge_engine::bridge::{FrameLoop, LoopState};
    use blitbridge_engine::canvas::{DeviceError, Rgba, SurfaceId};
    use blitbridge_engine::input::{Key, KeyCode};

    fn load(wat: &str) -> WasmModule {
        WasmModule::from_bytes(wat, Bridge::default()).unwrap()
    }

    const ALL_IMPORTS: &str = r#"
      (module
        (import "env" "get_keydown" (func (result i32)))
        (import "env" "create_texture" (func (param i32 i32 i32) (result i32)))
        (import "env" "set_render_target" (func (param i32)))
        (import "env" "set_render_source" (func (param i32)))
        (import "env" "set_line_color" (func (param i32)))
        (import "env" "set_fill_color" (func (param i32)))
        (import "env" "set_color_mod" (func (param i32)))
        (import "env" "set_rect_size" (func (param i32 i32 i32 i32)))
        (import "env" "render_copy" (func (param i32 i32 i32 i32)))
        (import "env" "fill_rect" (func (param i32 i32 i32 i32)))
        (import "env" "toggle_scale_factor" (func))
        (import "env" "begin_path" (func))
        (import "env" "close_path" (func))
        (import "env" "move_to" (func (param i32 i32)))
        (import "env" "line_to" (func (param i32 i32)))
        (import "env" "stroke" (func))
        (memory (export "memory") 1)
        (func (export "init") (param f64) (result i32) i32.const 0)
        (func (export "update") (param f64) (result i32) i32.const 0))
    "#;

    /// Fills the screen white and returns the polled key, so any pending key ends the loop.
    const KEY_ECHO: &str = r#"
      (module
        (import "env" "get_keydown" (func $key (result i32)))
        (import "env" "set_fill_color" (func $fill_color (param i32)))
        (import "env" "fill_rect" (func $fill (param i32 i32 i32 i32)))
        (memory (export "memory") 1)
        (func (export "init") (param f64) (result i32) i32.const 0)
        (func (export "update") (param f64) (result i32)
          (call $fill_color (i32.const 15))
          (call $fill (i32.const 0) (i32.const 0) (i32.const 0) (i32.const 0))
          (call $key)))
    "#;

    /// `update` creates one texture and returns its handle.
    fn texture_module(ptr: u32, w: u32, h: u32) -> WasmModule {
        load(&format!(
            r#"
          (module
            (import "env" "create_texture" (func $tex (param i32 i32 i32) (result i32)))
            (memory (export "memory") 1)
            (data (i32.const 16) "\0a\14\1e\ff")
            (func (export "init") (param f64) (result i32) i32.const 0)
            (func (export "update") (param f64) (result i32)
              (call $tex (i32.const {ptr}) (i32.const {w}) (i32.const {h}))))
        "#
        ))
    }

    // ── linking ───────────────────────────────────────────────────────────

    #[test]
    fn full_import_set_links() {
        let mut m = load(ALL_IMPORTS);
        assert_eq!(m.init(0.0).unwrap(), 0);
    }

    #[test]
    fn unknown_import_fails_to_instantiate() {
        let wat = r#"(module (import "env" "play_sound" (func)))"#;
        assert!(WasmModule::from_bytes(wat, Bridge::default()).is_err());
    }

    #[test]
    fn missing_update_export_is_a_bootstrap_error() {
        let wat = r#"(module (func (export "init") (param f64) (result i32) i32.const 0))"#;
        let err = WasmModule::from_bytes(wat, Bridge::default()).err().unwrap();
        assert!(err.to_string().contains("update"));
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[test]
    fn module_draws_and_finishes_on_key() {
        let mut lp = FrameLoop::start(load(KEY_ECHO), 0.0).unwrap();
        assert_eq!(lp.step(16.0).unwrap(), LoopState::Running);

        lp.bridge_mut().input_mut().on_key_down(Key::Escape, false);
        assert_eq!(lp.step(32.0).unwrap(), LoopState::Finished { code: KeyCode::Escape.wire() });

        let white = Rgba::new(255, 255, 255, 255);
        assert!(lp.bridge().device().primary().pixels().iter().all(|p| *p == white));
    }

    #[test]
    fn bad_handle_traps_with_device_error() {
        let wat = r#"
          (module
            (import "env" "set_render_target" (func $target (param i32)))
            (func (export "init") (param f64) (result i32) i32.const 0)
            (func (export "update") (param f64) (result i32)
              (call $target (i32.const 7))
              i32.const 0))
        "#;
        let mut lp = FrameLoop::start(load(wat), 0.0).unwrap();
        let err = lp.step(0.0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeviceError>(),
            Some(DeviceError::InvalidHandle { handle: 7, .. })
        ));
    }

    // ── create_texture ────────────────────────────────────────────────────

    #[test]
    fn texture_pixels_come_from_module_memory() {
        let mut m = texture_module(16, 1, 1);

        assert_eq!(m.update(0.0).unwrap(), 1);
        let s = m.bridge().device().surface(SurfaceId(1)).unwrap();
        assert_eq!(s.pixel(0, 0), Some(Rgba::new(10, 20, 30, 255)));
    }

    #[test]
    fn null_pointer_creates_blank_default_surface() {
        let mut m = texture_module(0, 0, 0);

        assert_eq!(m.update(0.0).unwrap(), 1);
        let s = m.bridge().device().surface(SurfaceId(1)).unwrap();
        assert_eq!((s.width(), s.height()), (256, 192));
    }

    #[test]
    fn out_of_bounds_image_returns_zero() {
        let mut m = texture_module(65_532, 2, 2);

        assert_eq!(m.update(0.0).unwrap(), 0);
        assert_eq!(m.bridge().device().surface_count(), 1);
    }

    #[test]
    fn guest_pixels_checks_overflow() {
        let mem = [0u8; 8];
        assert_eq!(guest_pixels(&mem, 4, 1, 1).map(<[u8]>::len), Some(4));
        assert!(guest_pixels(&mem, 5, 1, 1).is_none());
        assert!(guest_pixels(&mem, u32::MAX, u32::MAX, u32::MAX).is_none());
    }
}
