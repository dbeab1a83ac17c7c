fn main() {
    // Emits the ESP-IDF link/cfg directives when building inside an
    // ESP-IDF environment; a no-op on plain host builds.
    embuild::espidf::sysenv::output();
}
