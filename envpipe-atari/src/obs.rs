//! Lazily concatenated frame stacks.
use envpipe_core::{error::EnvPipeError, Obs};
use ndarray::{concatenate, ArrayD, ArrayViewD, Axis};
use std::{
    cell::{OnceCell, RefCell},
    fmt::Debug,
    sync::Arc,
};

/// The last `k` frames of an environment, concatenated along the first axis on demand.
///
/// Frames are shared with the [`FrameStack`](crate::FrameStack) that produced
/// them and with other stacks holding the same frames, so consecutive stacks
/// do not copy overlapping frames. The concatenation is computed on first
/// access through [`LazyFrames::len`], [`LazyFrames::get`] or
/// [`LazyFrames::as_array`], memoized, and the references to the frames are
/// then released.
///
/// ```rust
/// use envpipe_atari::LazyFrames;
/// use ndarray::{ArrayD, IxDyn};
/// use std::sync::Arc;
///
/// # fn main() -> anyhow::Result<()> {
/// let frame = Arc::new(ArrayD::<u8>::zeros(IxDyn(&[1, 84, 84])));
/// let stack = LazyFrames::new(vec![frame; 4])?;
/// assert_eq!(stack.shape(), &[4, 84, 84]);
/// assert!(!stack.is_materialized());
///
/// assert_eq!(stack.len(), 4);
/// assert!(stack.is_materialized());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LazyFrames<T> {
    frames: RefCell<Vec<Arc<ArrayD<T>>>>,
    shape: Vec<usize>,
    out: OnceCell<ArrayD<T>>,
}

impl<T: Clone> LazyFrames<T> {
    /// Creates a stack of `frames`, which must be non-empty and share one shape
    /// of at least one dimension.
    pub fn new(frames: Vec<Arc<ArrayD<T>>>) -> anyhow::Result<Self> {
        let first = match frames.first() {
            Some(f) if f.ndim() > 0 => f.shape().to_vec(),
            Some(f) => {
                return Err(EnvPipeError::InvalidConfig(format!(
                    "frames must have at least one dimension, got {:?}",
                    f.shape()
                ))
                .into())
            }
            None => {
                return Err(EnvPipeError::InvalidConfig("no frames to stack".to_string()).into())
            }
        };
        if let Some(f) = frames.iter().find(|f| f.shape() != first.as_slice()) {
            return Err(EnvPipeError::ShapeMismatch {
                expected: first,
                found: f.shape().to_vec(),
            }
            .into());
        }

        let mut shape = first;
        shape[0] *= frames.len();

        Ok(Self {
            frames: RefCell::new(frames),
            shape,
            out: OnceCell::new(),
        })
    }

    /// Shape of the concatenated array. Does not force materialization.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Length along the first axis.
    pub fn len(&self) -> usize {
        self.as_array().len_of(Axis(0))
    }

    /// Always `false`: a stack holds at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The element at `index` of the concatenated array.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.as_array().get(index)
    }

    /// The concatenated array.
    pub fn as_array(&self) -> &ArrayD<T> {
        self.out.get_or_init(|| {
            let frames = std::mem::take(&mut *self.frames.borrow_mut());
            concat(&frames)
        })
    }

    /// A view of the concatenated array.
    pub fn view(&self) -> ArrayViewD<'_, T> {
        self.as_array().view()
    }

    /// `true` once the concatenation was computed.
    pub fn is_materialized(&self) -> bool {
        self.out.get().is_some()
    }

    /// Consumes the stack, returning the concatenated array.
    pub fn into_array(self) -> ArrayD<T> {
        match self.out.into_inner() {
            Some(out) => out,
            None => concat(&self.frames.into_inner()),
        }
    }
}

fn concat<T: Clone>(frames: &[Arc<ArrayD<T>>]) -> ArrayD<T> {
    let views = frames.iter().map(|f| f.view()).collect::<Vec<_>>();
    concatenate(Axis(0), &views).unwrap_or_else(|_| unreachable!())
}

impl<T: Clone> From<LazyFrames<T>> for ArrayD<T> {
    fn from(frames: LazyFrames<T>) -> Self {
        frames.into_array()
    }
}

impl<T: Debug> Obs for LazyFrames<T> {}
