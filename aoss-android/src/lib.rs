//! JNI bridge for the AOSS Android view
//!
//! `AOSSView.analyzeFrame` tracks the two largest dark skin-tone blobs in
//! each camera preview frame and marks them on the RGBA preview.
//! `SoundSynt.generateTone` turns the tracked distance into a PCM tone.

pub mod error;
pub mod frame;
pub mod tone;

use std::sync::{Mutex, OnceLock};

use aoss_shared::FpsMeter;
use aoss_vision::BlobTracker;
use jni::objects::{JByteArray, JObject};
use jni::sys::{jbyteArray, jdouble, jint};
use jni::JNIEnv;

use error::{BridgeError, Result};
use frame::{frame_size, preview_tracker, reported_distance, track_preview, NO_PAIR};
use tone::ToneSynth;

static TRACKER: OnceLock<BlobTracker> = OnceLock::new();
static FPS: Mutex<Option<FpsMeter>> = Mutex::new(None);

fn tracker() -> &'static BlobTracker {
    TRACKER.get_or_init(preview_tracker)
}

fn measure_fps() {
    let Ok(mut guard) = FPS.lock() else {
        return;
    };
    let meter = guard.get_or_insert_with(FpsMeter::new);
    if meter.measure().is_some() {
        log::info!("{}", meter.label());
    }
}

fn throw(env: &mut JNIEnv, err: &BridgeError) {
    log::error!("{}", err);
    // A pending exception already describes the failure
    if env.exception_check().unwrap_or(true) {
        return;
    }
    if let Err(throw_err) = env.throw_new(err.java_class(), err.to_string()) {
        log::error!("Failed to raise {}: {}", err.java_class(), throw_err);
    }
}

fn analyze_frame(
    env: &mut JNIEnv,
    yuv: &JByteArray,
    width: jint,
    height: jint,
    rgba: &JByteArray,
) -> Result<f64> {
    let (w, h) = frame_size(width, height)?;
    let luma = env.convert_byte_array(yuv)?;
    let mut pixels = env.convert_byte_array(rgba)?;

    let pair = track_preview(tracker(), &luma, &mut pixels, w, h)?;
    if let Some(pair) = &pair {
        let ((x1, y1), (x2, y2)) = pair.pixel_centers();
        log::debug!("centers ({}, {}) ({}, {})", x1, y1, x2, y2);

        let signed: Vec<i8> = pixels.iter().map(|&b| b as i8).collect();
        env.set_byte_array_region(rgba, 0, &signed)?;
    }

    measure_fps();
    Ok(reported_distance(pair.as_ref()))
}

#[no_mangle]
pub extern "system" fn Java_org_opencv_aoss_AOSSView_analyzeFrame<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    yuv: JByteArray<'local>,
    width: jint,
    height: jint,
    rgba: JByteArray<'local>,
) -> jdouble {
    match analyze_frame(&mut env, &yuv, width, height, &rgba) {
        Ok(distance) => distance,
        Err(err) => {
            throw(&mut env, &err);
            NO_PAIR
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_org_opencv_aoss_SoundSynt_generateTone<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    distance: jdouble,
) -> jbyteArray {
    let synth = ToneSynth::default();
    log::debug!("{} >> {}", distance, synth.frequency(distance));

    match env.byte_array_from_slice(&synth.pcm(distance)) {
        Ok(array) => array.into_raw(),
        Err(err) => {
            throw(&mut env, &BridgeError::from(err));
            JObject::null().into_raw()
        }
    }
}
