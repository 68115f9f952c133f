use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Request bookkeeping for a self-rescheduling loop, independent of the browser.
///
/// `C` is the callback handed to the scheduler; the loop is armed while it is held.
struct Schedule<C> {
    /// Id of the pending request, if one is scheduled.
    handle: Option<i32>,
    /// `None` once cancelled; a callback already running then stops rescheduling.
    callback: Option<C>,
}

impl<C> Schedule<C> {
    fn new() -> Self {
        Self {
            handle: None,
            callback: None,
        }
    }

    fn arm(&mut self, callback: C, handle: i32) {
        self.callback = Some(callback);
        self.handle = Some(handle);
    }

    fn is_armed(&self) -> bool {
        self.callback.is_some()
    }

    /// The pending request has been delivered.
    fn fired(&mut self) {
        self.handle = None;
    }

    /// Disarm and return the request that still has to be cancelled with the host.
    fn cancel(&mut self) -> Option<i32> {
        self.callback = None;
        self.handle.take()
    }

    /// Ask for the next request while armed. A failed request disarms the loop.
    fn reschedule_with<E>(&mut self, request: impl FnOnce(&C) -> Result<i32, E>) -> Result<(), E> {
        let Some(callback) = self.callback.as_ref() else {
            return Ok(());
        };
        match request(callback) {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.callback = None;
                Err(err)
            }
        }
    }
}

/// A self-rescheduling `requestAnimationFrame` loop.
///
/// Holds the pending request id so the loop can be cancelled; dropping it cancels too.
pub struct FrameLoop {
    state: Rc<RefCell<Schedule<FrameCallback>>>,
}

impl FrameLoop {
    /// Call `on_frame` with the refresh timestamp (ms) on every display refresh.
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let state = Rc::new(RefCell::new(Schedule::new()));

        let weak: Weak<RefCell<Schedule<FrameCallback>>> = Rc::downgrade(&state);
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().fired();
            }
            on_frame(timestamp);
            if let Some(state) = weak.upgrade() {
                if let Err(err) = state.borrow_mut().reschedule_with(request_frame) {
                    log::error!("requestAnimationFrame failed, loop stopped: {err:?}");
                }
            }
        });

        let handle = request_frame(&callback)?;
        state.borrow_mut().arm(callback, handle);
        Ok(Self { state })
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_armed()
    }

    /// Cancel the pending refresh and release the callback. Safe to call repeatedly,
    /// including from inside `on_frame`.
    ///
    /// The host side (`cancelAnimationFrame`) only runs in a browser; the bookkeeping
    /// it relies on is covered by the `Schedule` tests below.
    pub fn cancel(&self) {
        let pending = self.state.borrow_mut().cancel();
        if let (Some(handle), Some(window)) = (pending, web_sys::window()) {
            if let Err(err) = window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window available"))?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}
