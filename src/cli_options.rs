use std::collections::HashMap;

pub struct CliOptions {
    pub use_multi_thread: bool,
    pub scene_name: Option<String>,
    pub samples_per_pixel: u32,
    pub seed: u64,
    pub output: String,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            use_multi_thread: true,
            scene_name: None,
            samples_per_pixel: 64,
            seed: 1,
            output: String::from("output.png"),
        }
    }
}

impl CliOptions {
    pub fn message() -> &'static str {
        r#"
        --use_multi_thread | --use_single_thread
        --scene_name <preset name>
        --spp <samples per pixel>
        --seed <rng seed>
        --output <file.png | file.exr>
        "#
    }
}

pub fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut pairs: HashMap<String, Option<String>> = HashMap::new();
    let mut args = args.into_iter().rev().collect::<Vec<_>>();
    args.pop(); // Removes args[0]

    while let Some(key) = args.pop() {
        if !key.starts_with('-') {
            return Err(format!("Unrecognized key {}", key));
        }
        match args.last() {
            None => {
                pairs.insert(key, None);
            }
            Some(value) => {
                if value.starts_with('-') {
                    pairs.insert(key, None);
                } else {
                    let value = args.pop();
                    pairs.insert(key, value);
                }
            }
        }
    }
    let mut options = CliOptions::default();
    for (k, v) in pairs.into_iter() {
        match k.as_str() {
            "--use_multi_thread" => options.use_multi_thread = true,
            "--use_single_thread" => options.use_multi_thread = false,
            "--scene_name" => options.scene_name = v,
            "--spp" => {
                let value = v.ok_or("--spp needs a value")?;
                options.samples_per_pixel = value
                    .parse()
                    .map_err(|e| format!("bad --spp value {}: {}", value, e))?;
            }
            "--seed" => {
                let value = v.ok_or("--seed needs a value")?;
                options.seed = value
                    .parse()
                    .map_err(|e| format!("bad --seed value {}: {}", value, e))?;
            }
            "--output" => {
                options.output = v.ok_or("--output needs a value")?;
            }
            "--help" => {
                println!("usage: {}", CliOptions::message());
            }
            _ => return Err(format!("Unrecognized key {}", k)),
        }
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("lumen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_flags_and_values() {
        let options = parse_args(args(&[
            "--use_single_thread",
            "--scene_name",
            "cornell_box",
            "--spp",
            "16",
            "--output",
            "render.exr",
        ]))
        .unwrap();
        assert!(!options.use_multi_thread);
        assert_eq!(options.scene_name.as_deref(), Some("cornell_box"));
        assert_eq!(options.samples_per_pixel, 16);
        assert_eq!(options.output, "render.exr");
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(parse_args(args(&["--frobnicate"])).is_err());
        assert!(parse_args(args(&["--spp", "many"])).is_err());
        assert!(parse_args(args(&["stray"])).is_err());
    }
}
