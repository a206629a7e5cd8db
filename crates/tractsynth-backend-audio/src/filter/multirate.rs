//! Decimation filters for oversampled synthesis.
//!
//! The voice model can run at 1, 2 or 16 times the output rate. The summed
//! ensemble signal is brought back to the output rate by:
//!
//! - 2x: one polyphase half-band IIR stage ([`HalfBandIir`])
//! - 16x: an 8-fold Butterworth lowpass ([`DecimationLowpass`]) followed by
//!   the same half-band stage
//!
//! All coefficients are fixed constants.

use tractsynth_spec::Oversample;

/// Allpass coefficients of the half-band branch fed with the earlier sample.
const HALF_BAND_AP0: [f64; 9] = [
    0.0765690656031399,
    0.264282270318935,
    0.47939467893641907,
    0.661681722389424,
    0.7924031566294969,
    0.8776927911111817,
    0.9308500986629166,
    0.9640156636878193,
    0.9862978287283355,
];

/// Allpass coefficients of the half-band branch fed with the later sample.
const HALF_BAND_AP1: [f64; 10] = [
    0.019911761024506557,
    0.16170648261075027,
    0.37320978687920564,
    0.5766558985008232,
    0.7334355636406803,
    0.8399227128761151,
    0.9074601780285125,
    0.9492937701934973,
    0.9760539731706528,
    0.9955323321150525,
];

/// Second order sections `[b0, b1, b2, a1, a2]` of a 16th order Butterworth
/// lowpass at `output_rate / 1.8`, designed for `8 * output_rate`.
pub const SOS_16_FOLD_FIRST_STAGE: [[f64; 5]; 8] = [
    [
        3.5903469155931847e-12,
        7.1806938311863695e-12,
        3.5903469155931847e-12,
        -1.2759657610561284,
        0.40787244610150275,
    ],
    [1.0, 2.0, 1.0, -1.2906502176887378, 0.42407495130188644],
    [1.0, 2.0, 1.0, -1.320459244427636, 0.456965573191349],
    [1.0, 2.0, 1.0, -1.3662708320207162, 0.5075130673741699],
    [1.0, 2.0, 1.0, -1.429387848302023, 0.5771549894497601],
    [1.0, 2.0, 1.0, -1.5114943545116066, 0.6677494954045713],
    [1.0, 2.0, 1.0, -1.6145439579130596, 0.7814521523555764],
    [1.0, 2.0, 1.0, -1.7405167001403739, 0.9204476945203488],
];

/// Samples the first stage consumes per half-band input in the 16x path.
const FIRST_STAGE_FOLD: usize = 8;

/// First order allpass section.
#[derive(Debug, Clone)]
struct FirstOrderAllpass {
    a: f64,
    x1: f64,
    y1: f64,
}

impl FirstOrderAllpass {
    fn new(a: f64) -> Self {
        Self { a, x1: 0.0, y1: 0.0 }
    }

    #[inline]
    fn process(&mut self, x0: f64) -> f64 {
        self.y1 = self.a * (x0 - self.y1) + self.x1;
        self.x1 = x0;
        self.y1
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

/// Polyphase half-band IIR decimator, 2 samples in and 1 sample out.
#[derive(Debug, Clone)]
pub struct HalfBandIir {
    ap0: Vec<FirstOrderAllpass>,
    ap1: Vec<FirstOrderAllpass>,
}

impl Default for HalfBandIir {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfBandIir {
    pub fn new() -> Self {
        Self {
            ap0: HALF_BAND_AP0.iter().map(|&a| FirstOrderAllpass::new(a)).collect(),
            ap1: HALF_BAND_AP1.iter().map(|&a| FirstOrderAllpass::new(a)).collect(),
        }
    }

    /// Decimates one pair of samples. `input0` must be the earlier one.
    #[inline]
    pub fn process(&mut self, input0: f64, input1: f64) -> f64 {
        let out0 = self.ap0.iter_mut().fold(input0, |x, ap| ap.process(x));
        let out1 = self.ap1.iter_mut().fold(input1, |x, ap| ap.process(x));
        0.5 * (out0 + out1)
    }

    pub fn reset(&mut self) {
        self.ap0.iter_mut().for_each(FirstOrderAllpass::reset);
        self.ap1.iter_mut().for_each(FirstOrderAllpass::reset);
    }
}

/// Cascaded biquad lowpass used ahead of a downsampler.
///
/// Sections are pipelined: each section consumes the output its predecessor
/// produced on the previous push, so the whole cascade costs one multiply-add
/// pass per input sample at the price of one sample of delay per section.
#[derive(Debug, Clone)]
pub struct DecimationLowpass {
    co: Vec<[f64; 5]>,
    x1: Vec<f64>,
    x2: Vec<f64>,
    y0: Vec<f64>,
    y1: Vec<f64>,
    y2: Vec<f64>,
}

impl DecimationLowpass {
    /// Creates a cascade from `[b0, b1, b2, a1, a2]` sections.
    pub fn new(sections: &[[f64; 5]]) -> Self {
        let n = sections.len();
        Self {
            co: sections.to_vec(),
            x1: vec![0.0; n],
            x2: vec![0.0; n],
            y0: vec![0.0; n],
            y1: vec![0.0; n],
            y2: vec![0.0; n],
        }
    }

    /// The first stage of the 16x decimator.
    pub fn sixteen_fold() -> Self {
        Self::new(&SOS_16_FOLD_FIRST_STAGE)
    }

    /// Pushes one input sample through every section.
    pub fn push(&mut self, input: f64) {
        let mut x0 = input;
        for i in 0..self.co.len() {
            let [b0, b1, b2, a1, a2] = self.co[i];
            // Section i reads what section i - 1 produced on the previous push.
            let next_x0 = self.y0[i];
            let y0 = b0 * x0 + b1 * self.x1[i] + b2 * self.x2[i]
                - a1 * self.y1[i]
                - a2 * self.y2[i];

            self.x2[i] = self.x1[i];
            self.x1[i] = x0;
            self.y2[i] = self.y1[i];
            self.y1[i] = y0;
            self.y0[i] = y0;

            x0 = next_x0;
        }
    }

    /// Latest output of the last section.
    pub fn output(&self) -> f64 {
        self.y0.last().copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        for buf in [
            &mut self.x1,
            &mut self.x2,
            &mut self.y0,
            &mut self.y1,
            &mut self.y2,
        ] {
            buf.fill(0.0);
        }
    }
}

/// Oversampling pipeline that turns oversampled frames into output samples.
///
/// One pipeline serves a whole ensemble render; it filters the summed voice
/// signal, never an individual voice.
#[derive(Debug, Clone)]
pub enum OversamplePipeline {
    /// No oversampling.
    Direct,
    /// 2x with a single half-band stage.
    HalfBand(HalfBandIir),
    /// 16x with an 8-fold lowpass and a half-band stage.
    SixteenFold {
        lowpass: DecimationLowpass,
        halfband: HalfBandIir,
    },
}

impl OversamplePipeline {
    /// Creates a fresh pipeline for an oversampling factor.
    pub fn new(over_sample: Oversample) -> Self {
        match over_sample {
            Oversample::X1 => Self::Direct,
            Oversample::X2 => Self::HalfBand(HalfBandIir::new()),
            Oversample::X16 => Self::SixteenFold {
                lowpass: DecimationLowpass::sixteen_fold(),
                halfband: HalfBandIir::new(),
            },
        }
    }

    /// Oversampled samples consumed per output sample.
    pub fn factor(&self) -> usize {
        match self {
            Self::Direct => 1,
            Self::HalfBand(_) => 2,
            Self::SixteenFold { .. } => 2 * FIRST_STAGE_FOLD,
        }
    }

    /// Produces one output sample, pulling [`factor`](Self::factor) samples
    /// from `source` in order.
    #[inline]
    pub fn next_sample<F: FnMut() -> f64>(&mut self, mut source: F) -> f64 {
        match self {
            Self::Direct => source(),
            Self::HalfBand(halfband) => {
                let hb0 = source();
                let hb1 = source();
                halfband.process(hb0, hb1)
            }
            Self::SixteenFold { lowpass, halfband } => {
                let mut frame = [0.0; 2];
                for slot in frame.iter_mut() {
                    for _ in 0..FIRST_STAGE_FOLD {
                        lowpass.push(source());
                    }
                    *slot = lowpass.output();
                }
                halfband.process(frame[0], frame[1])
            }
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::Direct => {}
            Self::HalfBand(halfband) => halfband.reset(),
            Self::SixteenFold { lowpass, halfband } => {
                lowpass.reset();
                halfband.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle_dc(over_sample: Oversample, outputs: usize) -> f64 {
        let mut pipeline = OversamplePipeline::new(over_sample);
        let mut last = 0.0;
        for _ in 0..outputs {
            last = pipeline.next_sample(|| 1.0);
        }
        last
    }

    #[test]
    fn test_factor_matches_oversample() {
        for os in [Oversample::X1, Oversample::X2, Oversample::X16] {
            assert_eq!(OversamplePipeline::new(os).factor(), os.factor() as usize);
        }
    }

    #[test]
    fn test_pipeline_pulls_factor_samples() {
        for os in [Oversample::X1, Oversample::X2, Oversample::X16] {
            let mut pipeline = OversamplePipeline::new(os);
            let mut pulled = 0;
            pipeline.next_sample(|| {
                pulled += 1;
                0.0
            });
            assert_eq!(pulled, os.factor() as usize);
        }
    }

    #[test]
    fn test_direct_is_identity() {
        let mut pipeline = OversamplePipeline::new(Oversample::X1);
        assert_eq!(pipeline.next_sample(|| 0.25), 0.25);
    }

    #[test]
    fn test_halfband_dc_gain_is_unity() {
        let out = settle_dc(Oversample::X2, 8000);
        assert!((out - 1.0).abs() < 1e-6, "dc {}", out);
    }

    #[test]
    fn test_sixteen_fold_dc_gain_is_unity() {
        let out = settle_dc(Oversample::X16, 8000);
        assert!((out - 1.0).abs() < 1e-6, "dc {}", out);
    }

    #[test]
    fn test_decimation_lowpass_dc_gain() {
        let mut lowpass = DecimationLowpass::sixteen_fold();
        for _ in 0..20_000 {
            lowpass.push(1.0);
        }
        assert!((lowpass.output() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_restores_initial_response() {
        let mut pipeline = OversamplePipeline::new(Oversample::X16);
        let first: Vec<f64> = (0..16)
            .map(|i| pipeline.next_sample(|| if i == 0 { 1.0 } else { 0.0 }))
            .collect();
        pipeline.reset();
        let second: Vec<f64> = (0..16)
            .map(|i| pipeline.next_sample(|| if i == 0 { 1.0 } else { 0.0 }))
            .collect();
        assert_eq!(first, second);
    }
}
