use super::check_shape;
use anyhow::Result;
use envpipe_core::{delegate_env, error::EnvPipeError, Env, Step};
use image::{ImageBuffer, Luma, Rgb};
use ndarray::{Array3, ArrayD, ArrayView3, Ix3};

/// Resizes RGB frames, optionally converting them to grayscale.
///
/// Input frames have shape `[height, width, 3]`. Output frames are
/// channel-first, `[1, height, width]` in grayscale mode and
/// `[3, height, width]` otherwise.
///
/// Luminance is `0.299 R + 0.587 G + 0.114 B` (ITU-R BT.601). Resizing
/// averages the source pixels covered by each output pixel, weighted by the
/// covered area.
pub struct WarpFrame<E> {
    env: E,
    width: usize,
    height: usize,
    grayscale: bool,
    in_shape: Vec<usize>,
    training: bool,
}

impl<E: Env<Obs = ArrayD<u8>>> WarpFrame<E> {
    /// Wraps `env`.
    pub fn new(env: E, width: usize, height: usize, grayscale: bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EnvPipeError::InvalidConfig(format!(
                "frame size must be positive, got {}x{}",
                width, height
            ))
            .into());
        }
        let in_shape = env.observation_shape();
        if in_shape.len() != 3 || in_shape[2] != 3 || in_shape[0] == 0 || in_shape[1] == 0 {
            return Err(EnvPipeError::InvalidConfig(format!(
                "WarpFrame expects RGB frames of shape [height, width, 3], got {:?}",
                in_shape
            ))
            .into());
        }

        Ok(Self {
            env,
            width,
            height,
            grayscale,
            in_shape,
            training: true,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    fn warp(&self, obs: ArrayD<u8>) -> Result<ArrayD<u8>> {
        check_shape(&self.in_shape, obs.shape())?;
        let frame = obs.into_dimensionality::<Ix3>()?;
        let frame = if self.grayscale {
            to_grayscale(frame.view())?
        } else {
            frame
        };
        let frame = resize_area(frame.view(), self.height, self.width);

        // HWC -> CHW
        Ok(frame
            .permuted_axes([2, 0, 1])
            .as_standard_layout()
            .into_owned()
            .into_dyn())
    }
}

fn to_grayscale(frame: ArrayView3<u8>) -> Result<Array3<u8>> {
    let (h, w, _) = frame.dim();
    let raw = frame.iter().cloned().collect::<Vec<_>>();
    let img = ImageBuffer::<Rgb<u8>, _>::from_raw(w as u32, h as u32, raw).ok_or_else(|| {
        EnvPipeError::ShapeMismatch {
            expected: vec![h, w, 3],
            found: frame.shape().to_vec(),
        }
    })?;
    let img = ImageBuffer::from_fn(w as u32, h as u32, |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x, y);
        Luma([luma(r, g, b)])
    });
    Ok(Array3::from_shape_vec((h, w, 1), img.into_raw())?)
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    l.round().max(0.0).min(255.0) as u8
}

/// For each destination index, the source indices it covers and their weights.
fn area_weights(src: usize, dst: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|i| {
            let lo = i as f64 * scale;
            let hi = (i + 1) as f64 * scale;
            let last = (hi.ceil() as usize).min(src);
            (lo.floor() as usize..last)
                .filter_map(|j| {
                    let overlap = hi.min((j + 1) as f64) - lo.max(j as f64);
                    if overlap > 0.0 {
                        Some((j, (overlap / scale) as f32))
                    } else {
                        None
                    }
                })
                .collect()
        })
        .collect()
}

fn resize_area(frame: ArrayView3<u8>, height: usize, width: usize) -> Array3<u8> {
    let (h, w, c) = frame.dim();
    let wy = area_weights(h, height);
    let wx = area_weights(w, width);
    let mut out = Array3::<u8>::zeros((height, width, c));

    for (y, ys) in wy.iter().enumerate() {
        for (x, xs) in wx.iter().enumerate() {
            for ch in 0..c {
                let mut acc = 0f32;
                for &(sy, a) in ys {
                    for &(sx, b) in xs {
                        acc += a * b * frame[[sy, sx, ch]] as f32;
                    }
                }
                out[[y, x, ch]] = acc.round().max(0.0).min(255.0) as u8;
            }
        }
    }

    out
}

impl<E: Env<Obs = ArrayD<u8>>> Env for WarpFrame<E> {
    type Obs = ArrayD<u8>;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        let obs = self.env.reset(seed)?;
        self.warp(obs)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let step = self.env.step(act)?;
        step.try_map_obs(|obs| self.warp(obs))
    }

    fn observation_shape(&self) -> Vec<usize> {
        let c = if self.grayscale { 1 } else { 3 };
        vec![c, self.height, self.width]
    }

    delegate_env!(env, without_shape);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        util::test::{ScriptedEnv, ScriptedStep},
        AtariAct, AtariAction,
    };
    use ndarray::Array;

    #[test_log::test]
    fn test_shape() -> Result<()> {
        let env = ScriptedEnv::new(210, 160, AtariAction::pong());
        let mut env = WarpFrame::new(env, 84, 84, true)?;
        assert_eq!(env.observation_shape(), vec![1, 84, 84]);

        let obs = env.reset(None)?;
        assert_eq!(obs.shape(), &[1, 84, 84]);

        // A uniform frame stays uniform.
        let obs = env.step(&AtariAct::new(0))?.obs;
        assert_eq!(obs.shape(), &[1, 84, 84]);
        assert!(obs.iter().all(|&v| v == 1));
        Ok(())
    }

    #[test_log::test]
    fn test_area_averaging() -> Result<()> {
        // Columns 0, 90 and 180, identical in every channel.
        let frame = Array::from_shape_fn((2, 3, 3), |(_, x, _)| (90 * x) as u8).into_dyn();
        let env = ScriptedEnv::new(2, 3, AtariAction::pong())
            .script(vec![ScriptedStep::reward(0.0).frame(frame)]);
        let mut env = WarpFrame::new(env, 2, 1, true)?;
        env.reset(None)?;
        let obs = env.step(&AtariAct::new(0))?.obs;

        // Output pixel 0 covers column 0 fully and a third of column 1.
        assert_eq!(obs.shape(), &[1, 1, 2]);
        assert_eq!(obs[[0, 0, 0]], 30);
        assert_eq!(obs[[0, 0, 1]], 150);
        Ok(())
    }

    #[test_log::test]
    fn test_color_mode_is_channel_first() -> Result<()> {
        let frame = Array::from_shape_fn((8, 8, 3), |(_, _, c)| (10 * (c + 1)) as u8).into_dyn();
        let env = ScriptedEnv::new(8, 8, AtariAction::pong())
            .script(vec![ScriptedStep::reward(0.0).frame(frame)]);
        let mut env = WarpFrame::new(env, 4, 4, false)?;
        assert_eq!(env.observation_shape(), vec![3, 4, 4]);

        env.reset(None)?;
        let obs = env.step(&AtariAct::new(0))?.obs;
        assert_eq!(obs.shape(), &[3, 4, 4]);
        for c in 0..3 {
            assert!(obs
                .index_axis(ndarray::Axis(0), c)
                .iter()
                .all(|&v| v as usize == 10 * (c + 1)));
        }
        Ok(())
    }

    #[test_log::test]
    fn test_grayscale_weights() -> Result<()> {
        let primary = |c: usize| {
            Array::from_shape_fn((4, 4, 3), move |(_, _, i)| if i == c { 255u8 } else { 0 })
                .into_dyn()
        };
        let env = ScriptedEnv::new(4, 4, AtariAction::pong()).script(vec![
            ScriptedStep::reward(0.0).frame(primary(0)),
            ScriptedStep::reward(0.0).frame(primary(1)),
            ScriptedStep::reward(0.0).frame(primary(2)),
        ]);
        let mut env = WarpFrame::new(env, 4, 4, true)?;
        env.reset(None)?;

        for &expected in [76u8, 150, 29].iter() {
            let obs = env.step(&AtariAct::new(0))?.obs;
            assert!(obs.iter().all(|&v| v == expected));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_size() {
        let env = ScriptedEnv::new(8, 8, AtariAction::pong());
        assert!(WarpFrame::new(env, 0, 84, true).is_err());
    }

    #[test]
    fn test_frame_of_wrong_shape() -> Result<()> {
        let env = ScriptedEnv::new(8, 8, AtariAction::pong())
            .script(vec![ScriptedStep::reward(0.0).frame(ArrayD::zeros(ndarray::IxDyn(&[4, 4, 3])))]);
        let mut env = WarpFrame::new(env, 4, 4, true)?;
        env.reset(None)?;
        let err = env.step(&AtariAct::new(0)).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<EnvPipeError>(),
            Some(EnvPipeError::ShapeMismatch { .. })
        ));
        Ok(())
    }
}
