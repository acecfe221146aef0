//! Sample catalog shown while the `projects` subtree is empty.

use super::project::{Category, Comment, Difficulty, Hardware, LessonStep, Project, Software};

fn hardware(name: &str, link: &str, image: &str) -> Hardware {
    Hardware {
        name: name.to_string(),
        link: link.to_string(),
        image: image.to_string(),
    }
}

fn software(name: &str, kind: &str) -> Software {
    Software {
        name: name.to_string(),
        kind: kind.to_string(),
    }
}

fn step(title: &str, content: &str) -> LessonStep {
    LessonStep {
        title: title.to_string(),
        content: content.to_string(),
        ..Default::default()
    }
}

fn comment(id: &str, author: &str, text: &str, timestamp: &str, color: &str, likes: u64) -> Comment {
    Comment {
        id: id.to_string(),
        author: author.to_string(),
        text: text.to_string(),
        timestamp: timestamp.to_string(),
        avatar_color: color.to_string(),
        likes,
    }
}

pub fn sample_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".into(),
            title: "Smart Garden Monitoring System".into(),
            description: "Build a system that monitors soil moisture, temperature, and light using ESP32 and sends alerts to your phone.".into(),
            author: "Dr. Sarah Chen".into(),
            difficulty: Difficulty::Intermediate,
            category: Category::Iot,
            thumbnail: "https://images.unsplash.com/photo-1585314062340-f1a5a7c9328d?auto=format&fit=crop&q=80&w=800".into(),
            views: 1240,
            likes: 89,
            duration: "4 Hours".into(),
            hardware: vec![
                hardware("ESP32 Development Board", "https://www.espressif.com/en/products/devkits/esp32-devkitc", "https://picsum.photos/id/1/100/100"),
                hardware("Capacitive Soil Moisture Sensor", "https://www.adafruit.com/product/4026", "https://picsum.photos/id/2/100/100"),
                hardware("DHT11 Temp & Humidity Sensor", "https://www.adafruit.com/product/386", "https://picsum.photos/id/3/100/100"),
            ],
            software: vec![
                software("Arduino IDE", "Programming"),
                software("Blynk IoT Platform", "Cloud Service"),
            ],
            steps: vec![
                step("Introduction", "In this project, we will explore the fundamentals of IoT by building a smart garden."),
                step("Wiring the Sensors", "Connect the VCC of both sensors to the 3.3V pin of the ESP32."),
                step("Coding with Arduino", "Upload the provided code to handle sensor data reading and WiFi connection."),
            ],
            comments: vec![
                comment("c1", "Alex Rivera", "This worked perfectly for my final year project! Thanks for the clear wiring diagram.", "2 days ago", "bg-green-500", 12),
                comment("c2", "Jamie Lee", "Is there a way to add a water pump to this as well?", "5 hours ago", "bg-purple-500", 3),
            ],
            published_at: "2023-10-15".into(),
            makecode_url: None,
        },
        Project {
            id: "2".into(),
            title: "AI Hand Gesture Controller".into(),
            description: "Use MediaPipe and Python to control your computer volume using hand gestures and a simple webcam.".into(),
            author: "James Wilson".into(),
            difficulty: Difficulty::Advanced,
            category: Category::Ai,
            thumbnail: "https://images.unsplash.com/photo-1555255707-c0796c88bc21?auto=format&fit=crop&q=80&w=800".into(),
            views: 3500,
            likes: 245,
            duration: "6 Hours".into(),
            hardware: vec![hardware(
                "Computer with Webcam",
                "https://www.logitech.com/en-us/products/webcams/c920-pro-hd-webcam.960-000764.html",
                "https://picsum.photos/id/4/100/100",
            )],
            software: vec![
                software("Python 3.9+", "Programming"),
                software("MediaPipe", "Library"),
                software("OpenCV", "Library"),
            ],
            steps: vec![
                step("Setup Environment", "Install the necessary libraries using pip install mediapipe opencv-python."),
                step("Hand Landmarks Detection", "Detecting 21 unique hand landmarks in real-time."),
            ],
            comments: vec![comment(
                "c3",
                "Marcus Thorn",
                "The latency is surprisingly low. Great use of MediaPipe!",
                "1 week ago",
                "bg-blue-500",
                45,
            )],
            published_at: "2023-11-02".into(),
            makecode_url: None,
        },
        Project {
            id: "3".into(),
            title: "Micro:bit Obstacle Avoiding Robot".into(),
            description: "A simple entry-level robotics project using Micro:bit and ultrasonic sensors.".into(),
            author: "STEM Academy Team".into(),
            difficulty: Difficulty::Beginner,
            category: Category::Robotics,
            thumbnail: "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?auto=format&fit=crop&q=80&w=800".into(),
            views: 890,
            likes: 42,
            duration: "2 Hours".into(),
            hardware: vec![
                hardware("Micro:bit V2", "https://microbit.org/buy/", "https://picsum.photos/id/5/100/100"),
                hardware("Ultrasonic Sensor", "https://www.sparkfun.com/products/15569", "https://picsum.photos/id/6/100/100"),
                hardware("2WD Robot Chassis", "https://www.dfrobot.com/product-367.html", "https://picsum.photos/id/7/100/100"),
            ],
            software: vec![software("MakeCode Editor", "Blockly")],
            steps: vec![
                step("Assembly", "Mount the motors and micro:bit to the chassis."),
                LessonStep {
                    makecode_url: Some("https://makecode.microbit.org/_0hALc73qFVsj".into()),
                    ..step("Logic Flow", "If distance < 10cm, then turn right. You can interact with the code below!")
                },
            ],
            comments: vec![comment(
                "c4",
                "Sarah Student",
                "I love micro:bit! This was so fun to build.",
                "1 day ago",
                "bg-orange-500",
                5,
            )],
            published_at: "2023-12-01".into(),
            makecode_url: Some("https://makecode.microbit.org/_0hALc73qFVsj".into()),
        },
    ]
}
