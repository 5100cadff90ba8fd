use console::Style;
use isoprof_core::axial::{AxialConfig, AxialProfile};
use isoprof_core::fit::{FitConfig, FittedProfile};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_fit_summary(profile: &FittedProfile, config: &FitConfig) {
    let s = Styles::new();

    print_title(&s, "Isophote Fit");
    println!(
        "  {:<14}{}",
        s.label.apply_to("Loss"),
        s.method.apply_to(config.loss)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Radii"),
        s.value.apply_to(profile.len())
    );
    let status = if profile.converged {
        s.method.apply_to("converged".to_string())
    } else {
        s.disabled.apply_to("iteration cap".to_string())
    };
    println!(
        "  {:<14}{} ({})",
        s.label.apply_to("Iterations"),
        s.value.apply_to(profile.iterations),
        status
    );
    if let (Some(e), Some(pa)) = (profile.median_ellipticity(), profile.median_position_angle()) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Median"),
            s.value.apply_to(format!("e = {e:.3}, pa = {:.1} deg", pa.to_degrees()))
        );
    }
    println!("  {}", s.label.apply_to(&profile.fit_limit_annotation));
    println!();

    println!(
        "  {}",
        s.header.apply_to(format!(
            "{:>9} {:>8} {:>8} {:>9} {:>8} {:>8} {:>9}",
            "R [pix]", "e", "e err", "pa [deg]", "pa err", "e fit", "pa fit"
        ))
    );
    for i in 0..profile.len() {
        println!(
            "  {:>9.2} {:>8.4} {:>8.4} {:>9.2} {:>8.2} {:>8.4} {:>9.2}",
            profile.radii[i],
            profile.ellipticity[i],
            profile.ellipticity_error[i],
            profile.position_angle[i].to_degrees(),
            profile.position_angle_error[i].to_degrees(),
            profile.smooth_ellipticity[i],
            profile.smooth_position_angle[i].to_degrees(),
        );
    }
    println!();
}

/// Print the four branches of the strip nearest the centre.
pub fn print_axial_summary(profile: &AxialProfile, config: &AxialConfig) {
    let s = Styles::new();

    print_title(&s, "Axial Profiles");
    println!(
        "  {:<14}{}",
        s.label.apply_to("Pixscale"),
        s.value.apply_to(format!("{} arcsec/pix", config.pixscale))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Zeropoint"),
        s.value.apply_to(config.zeropoint)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Average"),
        s.method.apply_to(config.average)
    );
    println!();

    let mut header = format!("{:>10}", "R [arcsec]");
    for branch in &profile.branches {
        header.push_str(&format!(" {:>18}", branch.label()));
    }
    println!("  {}", s.header.apply_to(header));

    for (j, r) in profile.radii.iter().enumerate() {
        let mut row = format!("{:>10.3}", r * config.pixscale);
        for branch in &profile.branches {
            match branch.lines.first().and_then(|line| line[j]) {
                Some(sb) => row.push_str(&format!(" {:>9.3} ±{:>7.3}", sb.sb, sb.sb_err)),
                None => row.push_str(&format!(" {:>18}", "-")),
            }
        }
        println!("  {row}");
    }
    println!();
}
