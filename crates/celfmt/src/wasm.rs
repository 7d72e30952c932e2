//! WebAssembly entry point.
//!
//! Loading the module installs logging, reports build metadata and defines
//! `celFmt` on the JavaScript global object. The instance then stays
//! resident until the host unloads it.

use std::cell::{Cell, RefCell};

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::bridge::{Bridge, CallResult, HostValue};
use crate::logging::{self, console};
use crate::metadata;

/// Name of the global function.
pub const GLOBAL_NAME: &str = "celFmt";

thread_local! {
    static BRIDGE: RefCell<Bridge> = RefCell::new(Bridge::new());
    static REGISTERED: Cell<bool> = const { Cell::new(false) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(|info| console::log(&info.to_string())));
    logging::init();
    metadata::report_build_metadata();
    register()
}

/// Define `celFmt` on the global object. Later calls do nothing.
pub fn register() -> Result<(), JsValue> {
    if REGISTERED.with(Cell::get) {
        return Ok(());
    }

    let handler = Closure::<dyn Fn(Array) -> JsValue>::new(handle);
    // Collects the variadic arguments into one array for `handler`.
    let wrap = Function::new_with_args(
        "handler",
        "return function celFmt() { return handler(Array.from(arguments)); };",
    );
    let func = wrap.call1(&JsValue::NULL, handler.as_ref())?;
    Reflect::set(&js_sys::global(), &JsValue::from_str(GLOBAL_NAME), &func)?;

    // The global keeps calling into the closure for the life of the module.
    handler.forget();
    REGISTERED.with(|registered| registered.set(true));
    Ok(())
}

fn handle(args: Array) -> JsValue {
    let args: Vec<HostValue> = args.iter().map(|arg| host_value(&arg)).collect();
    let result = BRIDGE.with(|bridge| bridge.borrow_mut().call(&args));
    to_record(&result).unwrap_or_else(|err| err)
}

fn host_value(value: &JsValue) -> HostValue {
    if let Some(s) = value.as_string() {
        HostValue::String(s)
    } else if let Some(n) = value.as_f64() {
        HostValue::Number(n)
    } else if let Some(b) = value.as_bool() {
        HostValue::Boolean(b)
    } else if value.is_null() {
        HostValue::Null
    } else if value.is_undefined() {
        HostValue::Undefined
    } else {
        HostValue::Other
    }
}

fn to_record(result: &CallResult) -> Result<JsValue, JsValue> {
    let record = Object::new();
    let (key, value) = result.field();
    Reflect::set(&record, &JsValue::from_str(key), &JsValue::from_str(value))?;
    Ok(record.into())
}
