//! 实验结果.

use crate::profile::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Sweeps: {} ({} failed)", p.sweeps(), p.failed())?;
    writeln!(w, "{S4}Radius points: {}", p.points())?;
    writeln!(w, "{S4}EDT calls: {}", p.edt_calls())?;
    writeln!(w, "{S4}EDT total time: {} us", p.edt_time_us())?;
    writeln!(
        w,
        "{S4}EDT average time: {} us",
        f64_to_display(p.avg_edt_time_us())
    )?;
    writeln!(w, "{S4}EDT share of sweep time: {}", f64_to_display(p.edt_share()))?;
    writeln!(w, "{S4}Sweep total time: {} us", p.sweep_time_us())?;
    writeln!(w, "{S4}Total machine time: {} us", p.real_time_us())?;
    let t = p.most_time_consuming().map(|d| d.as_micros().to_string());
    write!(
        w,
        "{S4}Most time-consuming sweep costs {} us",
        t.as_deref().unwrap_or("/")
    )?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(&'static str, Profile)>,
    consistent: bool,
}

impl AblationResult {
    /// `consistent` 表示全部提供者输出的曲线是否逐位一致.
    pub fn new<I: IntoIterator<Item = (&'static str, Profile)>>(it: I, consistent: bool) -> Self {
        Self {
            data: it.into_iter().collect(),
            consistent,
        }
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut buf).unwrap();
            println!("{}", String::from_utf8_lossy(&buf));
            buf.clear();

            utils::sep();
        }
        if self.consistent {
            println!("All providers produced identical curves.");
        } else {
            println!("Providers DISAGREE on at least one curve!");
        }
    }
}
