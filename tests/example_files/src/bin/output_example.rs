use std::env;

use dmxctl::{SceneFile, Universe};
use example_files::{load_rig, EXAMPLES_DIR};

fn main() {
    let args: Vec<String> = env::args().collect();
    let path = EXAMPLES_DIR.to_owned().join(&args[1]);
    println!("loading {:?}", &path);
    if args[1].starts_with("scenes") {
        let scene = SceneFile::from_path(&path);
        println!("{scene:#?}");
        if let Ok(scene) = scene {
            let mut rig = load_rig();
            match dmxctl::check_scene(&rig, &scene) {
                Ok(plan) => {
                    plan.apply(&mut rig);
                    print!("{}", serde_yaml::to_string(&rig).unwrap());
                }
                Err(e) => println!("{e}"),
            }
        }
    } else {
        match Universe::from_path(&path) {
            Ok(universe) => print!("{}", serde_yaml::to_string(&universe).unwrap()),
            Err(e) => println!("{e}"),
        }
    }
}
