//! Diversity seeds for the opening user message.
//!
//! A handful of these are sampled per example and shown to the generator as
//! inspiration, so the first user turn varies in tone, spelling and language.

/// Built-in pool of opening-message seeds.
pub const USER_FIRST_PROMPTS: &[&str] = &[
    "hi",
    "Hi!",
    "hello",
    "Hello?",
    "hey there",
    "Hey!",
    "yo",
    "Yo!",
    "Good morning",
    "Good evening!",
    "Howdy",
    "sup",
    "What's up?",
    "Hey, who are you?",
    "Hello there :)",
    "Hi, what is this?",
    "Hey, are you a chatbot?",
    "Hello! Who am I talking to?",
    "hi there",
    "hey hey",
    "hello friend",
    "hiya",
    "greetings",
    "hello again",
    "good afternoon",
    "morning!",
    "evening!",
    "hi bot",
    "hi assistant",
    "hey, anyone here?",
    "hi! what do you do?",
    "hello from the other side",
    "hey you",
    "hello world",
    "hey! what's going on",
    "hello :)",
    "yo! how are you",
    "hi! can you talk",
    "hi, what's your name",
    "hey! are you alive",
    "hiya! what are you",
    "hello! tell me about yourself",
    "hi, are you the ai",
    "yo, what is this",
    "hello my friend",
    "hey buddy",
    "hello hello",
    "yo! what's up",
    "hi! are you real",
    "hey, how's it going",
    "hello! can you hear me",
    "yo, what model are you",
    "hi! tell me a fun fact",
    "hello! introduce yourself",
    "hiya there",
    "hi! what's your story",
    "good day!",
    "hello! who's your creator",
    "hi! which version are you",
    "helo",
    "hey ther",
    "hii",
    "heloo!",
    "hi, whos this",
    "hay",
    "helloo??",
    "yo! any1 here?",
    "hi, what r u",
    "hai!",
    "sup bot?",
    "heyy",
    "hi! u there",
    "hi im bored",
    "heyyo",
    "heyyy",
    "wassup",
    "yo lol",
    "hiii",
    "hiyaaa",
    "sup",
    "heyyoo",
    "yo wut up",
    "helloo lol",
    "yo haha",
    "hru",
    "waddup",
    "heyy :)",
    "yooo",
    "yo bro",
    "haiii",
    "hey u",
    "yo whats gud",
    "yo lolol",
    "HI",
    "HELLOOO",
    "YO!!!",
    "HEY",
    "SUP",
    "WASSUP",
    "HEY!!!",
    "YO BRO",
    "HELLO??",
    "HI THERE!!",
    "YO WHATS UP",
    "HEY U",
    "HEYOOOO",
    "YO LOL",
    "HIII",
    "HIYA",
    "YOOOO",
    "HELLO!!!",
    "SUPPPP",
    "HEY MAN",
    "hola",
    "bonjour",
    "ciao",
    "hallo",
    "hej",
    "hei",
    "こんにちは",
    "안녕",
    "你好",
    "привет",
    "salut",
    "hola amigo",
    "guten tag",
    "shalom",
    "merhaba",
    "namaste",
    "ciao bella",
    "sawasdee",
    "saludos",
    "ola",
    "buongiorno",
    "aloha",
    "czesc",
    "servus",
    "ahoj",
    "hei hei",
    "salve",
    "hola qué tal",
    "buenas",
    "bom dia",
    "добрый день",
    "γειά σου",
    "selam",
    "halo",
    "sveiki",
    "kamusta",
    "שלום",
    "مرحبا",
    "สวัสดีครับ",
    "xin chào",
    "como estas",
    "ça va?",
    "wie geht’s",
    "tudo bem?",
    "你好吗",
    "annyeong haseyo",
    "konnichiwa, genki?",
    "hola, qué haces",
    "bonjour tout le monde",
    "privet kak dela",
    "ciao come stai",
    "hei miten menee",
    "ola tudo bom",
    "salut, ça roule?",
    "namaste, kaise ho",
    "merhaba nasılsın",
    "hola hola, todo bien?",
    "hej, hur är läget",
    "ahoj, jak se máš",
    "γειά, τι κάνεις",
];
