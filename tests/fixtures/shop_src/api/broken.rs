pub struct Unfinished {
    pub id: u32
    pub name: String
}
