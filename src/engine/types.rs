/// Internal render resolution, independent of on-screen magnification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub w: usize,
    pub h: usize,
    pub half_w: f32, // pre-derived for speed
    pub half_h: f32, // pre-derived for speed
}

impl Projection {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
        }
    }
}
