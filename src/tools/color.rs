//! Color space conversions between RGB, HSL, HSV and CMYK.
//!
//! Hue is in degrees `[0, 360)`; saturation, lightness, value and the CMYK
//! channels are percentages `[0, 100]`.

use crate::error::ToolError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

/// Every representation of one color
#[derive(Debug, Serialize)]
pub struct ColorConversion {
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
    pub hsv: Hsv,
    pub cmyk: Cmyk,
    pub css_rgb: String,
    pub css_hsl: String,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

// Hue (degrees) from normalized channels and their max/delta
fn hue(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let h = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

// Shared sector mapping for HSL/HSV -> RGB
fn from_chroma(h: f64, c: f64, m: f64) -> Rgb {
    let h = h.rem_euclid(360.0);
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb {
        r: channel(r + m),
        g: channel(g + m),
        b: channel(b + m),
    }
}

impl Rgb {
    fn normalized(&self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_hsl(&self) -> Hsl {
        let (r, g, b) = self.normalized();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;
        let s = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * l - 1.0).abs())
        };
        Hsl {
            h: hue(r, g, b, max, delta),
            s: s * 100.0,
            l: l * 100.0,
        }
    }

    pub fn to_hsv(&self) -> Hsv {
        let (r, g, b) = self.normalized();
        let max = r.max(g).max(b);
        let delta = max - r.min(g).min(b);
        Hsv {
            h: hue(r, g, b, max, delta),
            s: if max == 0.0 { 0.0 } else { delta / max * 100.0 },
            v: max * 100.0,
        }
    }

    pub fn to_cmyk(&self) -> Cmyk {
        let (r, g, b) = self.normalized();
        let k = 1.0 - r.max(g).max(b);
        if k >= 1.0 {
            return Cmyk {
                c: 0.0,
                m: 0.0,
                y: 0.0,
                k: 100.0,
            };
        }
        Cmyk {
            c: (1.0 - r - k) / (1.0 - k) * 100.0,
            m: (1.0 - g - k) / (1.0 - k) * 100.0,
            y: (1.0 - b - k) / (1.0 - k) * 100.0,
            k: k * 100.0,
        }
    }
}

impl Hsl {
    pub fn to_rgb(&self) -> Rgb {
        let s = self.s / 100.0;
        let l = self.l / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        from_chroma(self.h, c, l - c / 2.0)
    }
}

impl Hsv {
    pub fn to_rgb(&self) -> Rgb {
        let s = self.s / 100.0;
        let v = self.v / 100.0;
        let c = v * s;
        from_chroma(self.h, c, v - c)
    }
}

impl Cmyk {
    pub fn to_rgb(&self) -> Rgb {
        let k = self.k / 100.0;
        Rgb {
            r: channel((1.0 - self.c / 100.0) * (1.0 - k)),
            g: channel((1.0 - self.m / 100.0) * (1.0 - k)),
            b: channel((1.0 - self.y / 100.0) * (1.0 - k)),
        }
    }
}

pub fn parse_hex(input: &str) -> Result<Rgb, ToolError> {
    let hex = input.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => {
            return Err(ToolError::Malformed(format!(
                "'{}' is not a #rgb or #rrggbb color",
                input.trim()
            )))
        }
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ToolError::Malformed(format!(
            "'{}' contains non-hex digits",
            input.trim()
        )));
    }
    let byte = |i: usize| {
        expanded
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| ToolError::Malformed(format!("'{}' contains non-hex digits", input.trim())))
    };
    Ok(Rgb {
        r: byte(0)?,
        g: byte(2)?,
        b: byte(4)?,
    })
}

// Splits "name(a, b, c)" into the name and numeric arguments
fn parse_function(input: &str) -> Option<(String, Vec<f64>)> {
    let open = input.find('(')?;
    let inner = input[open + 1..].strip_suffix(')')?;
    let name = input[..open].trim().to_lowercase();
    let args = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.trim_end_matches('%').parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    Some((name, args))
}

fn check_range(name: &str, value: f64, max: f64) -> Result<f64, ToolError> {
    if (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ToolError::invalid(name, format!("{} is outside 0-{}", value, max)))
    }
}

/// Parse hex, `rgb()`, `hsl()`, `hsv()` or `cmyk()` notation into RGB
pub fn parse_color(input: &str) -> Result<Rgb, ToolError> {
    let trimmed = input.trim();
    if !trimmed.contains('(') {
        return parse_hex(trimmed);
    }

    let (name, args) = parse_function(trimmed)
        .ok_or_else(|| ToolError::Malformed(format!("could not parse color '{}'", trimmed)))?;

    match (name.as_str(), args.as_slice()) {
        ("rgb", [r, g, b]) => Ok(Rgb {
            r: check_range("r", *r, 255.0)?.round() as u8,
            g: check_range("g", *g, 255.0)?.round() as u8,
            b: check_range("b", *b, 255.0)?.round() as u8,
        }),
        ("hsl", [h, s, l]) => Ok(Hsl {
            h: check_range("h", *h, 360.0)?,
            s: check_range("s", *s, 100.0)?,
            l: check_range("l", *l, 100.0)?,
        }
        .to_rgb()),
        ("hsv", [h, s, v]) => Ok(Hsv {
            h: check_range("h", *h, 360.0)?,
            s: check_range("s", *s, 100.0)?,
            v: check_range("v", *v, 100.0)?,
        }
        .to_rgb()),
        ("cmyk", [c, m, y, k]) => Ok(Cmyk {
            c: check_range("c", *c, 100.0)?,
            m: check_range("m", *m, 100.0)?,
            y: check_range("y", *y, 100.0)?,
            k: check_range("k", *k, 100.0)?,
        }
        .to_rgb()),
        _ => Err(ToolError::Malformed(format!(
            "unsupported color notation '{}'",
            trimmed
        ))),
    }
}

pub fn convert_color(input: &str) -> Result<ColorConversion, ToolError> {
    let rgb = parse_color(input)?;
    let hsl = rgb.to_hsl();
    let hsv = rgb.to_hsv();
    let cmyk = rgb.to_cmyk();

    Ok(ColorConversion {
        hex: rgb.to_hex(),
        css_rgb: format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
        css_hsl: format!(
            "hsl({}, {}%, {}%)",
            hsl.h.round(),
            hsl.s.round(),
            hsl.l.round()
        ),
        rgb,
        hsl: Hsl {
            h: round1(hsl.h),
            s: round1(hsl.s),
            l: round1(hsl.l),
        },
        hsv: Hsv {
            h: round1(hsv.h),
            s: round1(hsv.s),
            v: round1(hsv.v),
        },
        cmyk: Cmyk {
            c: round1(cmyk.c),
            m: round1(cmyk.m),
            y: round1(cmyk.y),
            k: round1(cmyk.k),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [Rgb; 7] = [
        Rgb { r: 0, g: 0, b: 0 },
        Rgb { r: 255, g: 255, b: 255 },
        Rgb { r: 255, g: 0, b: 0 },
        Rgb { r: 18, g: 52, b: 86 },
        Rgb { r: 200, g: 150, b: 50 },
        Rgb { r: 128, g: 0, b: 255 },
        Rgb { r: 77, g: 77, b: 77 },
    ];

    #[test]
    fn pure_red() {
        let red = convert_color("#ff0000").unwrap();
        assert_eq!(red.rgb, Rgb { r: 255, g: 0, b: 0 });
        assert_eq!((red.hsl.h, red.hsl.s, red.hsl.l), (0.0, 100.0, 50.0));
        assert_eq!((red.hsv.h, red.hsv.s, red.hsv.v), (0.0, 100.0, 100.0));
        assert_eq!(
            (red.cmyk.c, red.cmyk.m, red.cmyk.y, red.cmyk.k),
            (0.0, 100.0, 100.0, 0.0)
        );
        assert_eq!(red.css_hsl, "hsl(0, 100%, 50%)");
    }

    #[test]
    fn spaces_round_trip_through_rgb() {
        for rgb in SAMPLES {
            assert_eq!(rgb.to_hsl().to_rgb(), rgb, "hsl {:?}", rgb);
            assert_eq!(rgb.to_hsv().to_rgb(), rgb, "hsv {:?}", rgb);
            assert_eq!(rgb.to_cmyk().to_rgb(), rgb, "cmyk {:?}", rgb);
            assert_eq!(parse_hex(&rgb.to_hex()).unwrap(), rgb);
        }
    }

    #[test]
    fn parses_css_notations() {
        assert_eq!(parse_color("#0f8").unwrap(), Rgb { r: 0, g: 255, b: 136 });
        assert_eq!(parse_color("rgb(10, 20, 30)").unwrap(), Rgb { r: 10, g: 20, b: 30 });
        assert_eq!(parse_color("hsl(120, 100%, 50%)").unwrap(), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(parse_color("HSV(240 100% 100%)").unwrap(), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(parse_color("cmyk(0, 0, 0, 100)").unwrap(), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn rejects_bad_colors() {
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("rgb(300, 0, 0)").is_err());
        assert!(parse_color("rgb(1, 2)").is_err());
        assert!(parse_color("lab(1, 2, 3)").is_err());
    }

    #[test]
    fn signs_are_not_hex_digits() {
        assert!(parse_hex("#+f+f+f").is_err());
        assert!(parse_hex("+ff").is_err());
        assert!(parse_hex("#-1-1-1").is_err());
        assert_eq!(parse_hex("0F0F0F").unwrap(), Rgb { r: 15, g: 15, b: 15 });
    }
}
